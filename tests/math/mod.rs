mod numerical_tests;
mod property_tests;
