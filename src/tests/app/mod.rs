mod dialog_tests;
