/// Request middleware
///
/// - [`auth`]: bearer-token authentication and the typed request
///   identity it produces

pub mod auth;
