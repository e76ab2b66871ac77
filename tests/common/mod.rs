#![allow(dead_code)]
pub mod context;
pub mod deposit_tests;
pub mod swap_tests;
pub mod withdraw_tests;
