mod token_tests;
