use serde::Deserialize;

// Client-writable fields only; absent ones decode to their zero value,
// and server-owned fields (`id`, `active`, timestamps) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}
