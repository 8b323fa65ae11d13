use dusys_models::User;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub user: User,
    pub roles: Vec<String>,
    pub company_id: Option<Value>,
}
