//! Object id generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

const TOKEN_LEN: usize = 16;

/// Generates a prefixed random id, e.g. `ord_9f82Ab31c0De44Aa`. The prefix makes ids
/// self-describing in logs and support tickets.
pub fn object_id(prefix: &str) -> String {
    let token = rand::thread_rng().sample_iter(&Alphanumeric).take(TOKEN_LEN).map(char::from).collect::<String>();
    format!("{prefix}_{token}")
}

/// Session tokens are longer than object ids since they act as bearer credentials.
pub fn session_token() -> String {
    let token = rand::thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect::<String>();
    format!("sess_{token}")
}
