/// Custom assertions for contract testing

/// Assert a `try_` call failed with the given contract error
#[macro_export]
macro_rules! assert_contract_error {
    ($result:expr, $expected:expr) => {
        match $result {
            Err(Ok(error)) => assert_eq!(error, $expected, "Contract error mismatch"),
            Err(Err(_)) => panic!("Expected contract error but the host aborted"),
            Ok(_) => panic!("Expected contract error but succeeded"),
        }
    };
}

/// Assert two amounts differ by at most `tolerance`
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right): (i128, i128) = ($left, $right);
        assert!(
            (left - right).abs() <= $tolerance,
            "{} and {} differ by more than {}",
            left,
            right,
            $tolerance
        );
    }};
}
