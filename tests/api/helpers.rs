use ata_digital::{
    authentication::TokenKeys,
    client::{ApiClient, AttendanceForm, ClassForm},
    configuration::{get_configuration, Settings},
    startup::{get_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Duration;
use once_cell::sync::Lazy;
use sqlx::SqlitePool;
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "integration-test-secret";

// Ensure that the `tracing` stack is only initialised once
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
    pub http: reqwest::Client,
}

pub struct TestTeacher {
    pub email: String,
    pub password: String,
    pub client: ApiClient,
}

impl TestApp {
    pub fn api_url(&self) -> String {
        format!("{}/api", self.address)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.api_url())
    }

    /// Registers a fresh teacher and returns a client holding their token.
    pub async fn teacher(&self) -> TestTeacher {
        let email = format!("{}@escola.edu.br", Uuid::new_v4().simple());
        let password = "senha-secreta".to_string();
        let mut client = self.client();
        client
            .register("Prof. Teste", &email, &password)
            .await
            .expect("Failed to register test teacher");
        TestTeacher {
            email,
            password,
            client,
        }
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.http
            .post(format!("{}{}", self.api_url(), path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_raw(&self, path: &str, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.http
            .post(format!("{}{}", self.api_url(), path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn preflight(&self, path: &str, origin: &str, method: &str) -> reqwest::Response {
        self.http
            .request(reqwest::Method::OPTIONS, format!("{}{}", self.api_url(), path))
            .header(reqwest::header::ORIGIN, origin)
            .header(reqwest::header::ACCESS_CONTROL_REQUEST_METHOD, method)
            .header(reqwest::header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.http.get(format!("{}{}", self.api_url(), path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn attendance_rows(&self, class_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE class_id = ?")
            .bind(class_id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count attendance rows.")
    }

    /// Keys matching the app's secret but issuing tokens that expired five
    /// minutes ago.
    pub fn expired_keys(&self) -> TokenKeys {
        TokenKeys::new(TEST_JWT_SECRET.as_bytes(), Duration::minutes(-5))
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], with a chance to adjust the settings first.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = 0;
        c.application.allowed_origins = Vec::new();
        c.database.filename = std::env::temp_dir().join(format!("ata-digital-{}.db", Uuid::new_v4()));
        c.database.create_if_missing = true;
        c.jwt.secret = TEST_JWT_SECRET.to_string();
        customise(&mut c);
        c
    };

    let application = Application::build(configuration.clone())
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_pool: get_connection_pool(&configuration.database),
        http: reqwest::Client::new(),
    }
}

pub fn sample_jpeg_data_url(width: u16, height: u16) -> String {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
        0x01, 0x00, 0x00,
    ]);
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}

pub fn class_form(name: &str) -> ClassForm {
    ClassForm {
        name: name.to_string(),
        course: "Ciência da Computação".to_string(),
        date: "2025-03-10".to_string(),
        start_time: "19:00".to_string(),
        duration: 100,
    }
}

pub fn attendance_form(class_id: i64, nome: &str, matricula: &str) -> AttendanceForm {
    AttendanceForm {
        class_id,
        nome: nome.to_string(),
        matricula: matricula.to_string(),
        curso: Some("CC".to_string()),
        periodo: Some("5".to_string()),
        biometria: sample_jpeg_data_url(120, 90),
    }
}
