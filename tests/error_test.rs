use stencil::error::Error;

#[test]
fn test_shape_error_names_the_key_path() {
    let err = Error::ShapeError {
        key_path: "flags.a.b".to_string(),
        expected: "boolean or nested mapping".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid value for 'flags.a.b': expected boolean or nested mapping."
    );
}

#[test]
fn test_output_directory_exists_error_message() {
    let err = Error::OutputDirectoryExistsError { output_dir: "out".to_string() };
    assert_eq!(
        err.to_string(),
        "Output directory 'out' already exists. Use --force to overwrite it."
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: Error = io.into();
    assert!(matches!(err, Error::IoError(_)));
    assert!(err.to_string().starts_with("IO error:"));
}

#[test]
fn test_config_error_message() {
    let err = Error::ConfigError("Syntax list has odd length 3".to_string());
    assert_eq!(err.to_string(), "Configuration error: Syntax list has odd length 3.");
}
