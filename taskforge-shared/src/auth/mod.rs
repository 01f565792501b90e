/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: the session token service (HS256 access + refresh tokens)
///
/// Both are capabilities the HTTP layer composes: the password side
/// never learns about tokens, the token side never sees a plaintext
/// password. Callers decide what to tell the client; in particular, a
/// failed login must never reveal whether the username or the password
/// was wrong.

pub mod jwt;
pub mod password;
