//! Typed HTTP client for the REST API, as used by the check-in and dashboard
//! front ends.
use reqwest::{Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    domain::{Attendance, AttendanceValidationError, Class, UserProfile},
    routes::{CreatedResponse, ErrorResponse, MessageResponse},
    utils::is_blank,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] AttendanceValidationError),

    #[error("Not logged in")]
    MissingToken,

    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassForm {
    pub name: String,
    pub course: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    pub duration: i64,
}

/// The check-in form: typed fields plus the captured photo.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AttendanceForm {
    #[serde(rename = "classId")]
    pub class_id: i64,
    pub nome: String,
    pub matricula: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodo: Option<String>,
    pub biometria: String,
}

impl AttendanceForm {
    pub fn validate(&self) -> Result<(), AttendanceValidationError> {
        if is_blank(Some(&self.nome)) {
            return Err(AttendanceValidationError::MissingField("nome"));
        }
        if is_blank(Some(&self.matricula)) {
            return Err(AttendanceValidationError::MissingField("matricula"));
        }
        if is_blank(Some(&self.biometria)) {
            return Err(AttendanceValidationError::MissingField("biometria"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdated {
    pub message: String,
    pub user: UserProfile,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:3002/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ClientError> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = parse(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .request(Method::POST, "/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = parse(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn create_class(&self, form: &ClassForm) -> Result<CreatedResponse, ClientError> {
        let response = self
            .authorized(Method::POST, "/classes")?
            .json(form)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn classes(&self) -> Result<Vec<Class>, ClientError> {
        let response = self.authorized(Method::GET, "/classes")?.send().await?;
        parse(response).await
    }

    pub async fn class(&self, id: i64) -> Result<Class, ClientError> {
        let response = self
            .authorized(Method::GET, &format!("/classes/{}", id))?
            .send()
            .await?;
        parse(response).await
    }

    pub async fn end_class(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let response = self
            .authorized(Method::PATCH, &format!("/classes/{}/end", id))?
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_class(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let response = self
            .authorized(Method::DELETE, &format!("/classes/{}", id))?
            .send()
            .await?;
        parse(response).await
    }

    /// Raw PDF bytes of the attendance sheet.
    pub async fn attendance_sheet(&self, class_id: i64) -> Result<Vec<u8>, ClientError> {
        let response = self
            .authorized(Method::GET, &format!("/classes/{}/attendance-sheet", class_id))?
            .send()
            .await?;
        let response = check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Validates the form locally; an incomplete form never reaches the
    /// network.
    pub async fn register_attendance(
        &self,
        form: &AttendanceForm,
    ) -> Result<CreatedResponse, ClientError> {
        form.validate()?;
        let response = self
            .request(Method::POST, "/attendance")
            .json(form)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn class_attendance(&self, class_id: i64) -> Result<Vec<Attendance>, ClientError> {
        let response = self
            .request(Method::GET, &format!("/attendance/class/{}", class_id))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_attendance(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let response = self
            .authorized(Method::DELETE, &format!("/attendance/{}", id))?
            .send()
            .await?;
        parse(response).await
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        let response = self.authorized(Method::GET, "/user/profile")?.send().await?;
        parse(response).await
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<ProfileUpdated, ClientError> {
        let response = self
            .authorized(Method::PUT, "/user/profile")?
            .json(form)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_account(&mut self) -> Result<MessageResponse, ClientError> {
        let response = self
            .authorized(Method::DELETE, "/user/account")?
            .send()
            .await?;
        let message = parse(response).await?;
        self.token = None;
        Ok(message)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}
