use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AccessToken {
    pub access_token: String,
}
