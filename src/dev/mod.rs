/// Development utilities module
///
/// The mock backend lets the UI and the commands run without a server
/// (`--mock`, behind the `development` feature) and backs the tests.
pub mod mock_client;
