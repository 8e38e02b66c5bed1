mod rebuild_tests;
mod settle_tests;
