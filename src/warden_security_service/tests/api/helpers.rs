use std::sync::{Arc, Mutex};

use secrecy::Secret;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use warden_adapters::{
    HashMapUserDirectory,
    config::{
        API_ROOT, AllowedOrigins, BootstrapAdminSettings, CsrfSettings, DatabaseSettings,
        RegistrationSettings, SecurityServiceSettings, ServerSettings, SessionSettings, defaults,
        test,
    },
};
use warden_core::{
    AuditEvent, AuditLogger, Email, NewUser, Password, Permission, PersonName, Role, RoleName,
    SECURITY_RESOURCE, UserDirectory, UserDirectoryError, Username,
};
use warden_security_service::{SecurityService, bootstrap};

pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "rootpassword";
pub const USER_PASSWORD: &str = "password123";
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Clone, Default)]
pub struct RecordingAuditLogger(Arc<Mutex<Vec<AuditEvent>>>);

impl RecordingAuditLogger {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AuditLogger for RecordingAuditLogger {
    async fn log(&self, event: AuditEvent) {
        self.0.lock().unwrap().push(event);
    }
}

pub fn test_settings(enforce_csrf: bool) -> SecurityServiceSettings {
    SecurityServiceSettings {
        server: ServerSettings {
            address: test::APP_ADDRESS.to_string(),
        },
        session: SessionSettings {
            cookie_name: defaults::SESSION_COOKIE_NAME.to_string(),
            secret: Secret::from("test-session-secret".to_owned()),
            ttl_seconds: 600,
        },
        csrf: CsrfSettings {
            secret: Secret::from("test-csrf-secret".to_owned()),
            ttl_seconds: 600,
            header_name: defaults::CSRF_HEADER_NAME.to_string(),
            enforce: enforce_csrf,
        },
        registration: RegistrationSettings {
            default_role: "Gamma".to_string(),
        },
        database: DatabaseSettings::default(),
        allowed_origins: Some(AllowedOrigins::new(vec![ALLOWED_ORIGIN.to_string()])),
        bootstrap_admin: Some(BootstrapAdminSettings {
            username: ADMIN_USERNAME.to_string(),
            first_name: "Root".to_string(),
            last_name: "User".to_string(),
            email: "root@example.com".to_string(),
            password: Secret::from(ADMIN_PASSWORD.to_owned()),
        }),
    }
}

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub directory: HashMapUserDirectory,
    pub audit: RecordingAuditLogger,
    pub csrf_header: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_settings(test_settings(false)).await
    }

    pub async fn with_csrf_enforced() -> Self {
        Self::with_settings(test_settings(true)).await
    }

    /// Seeds the directory, then serves it on a random local port.
    ///
    /// Besides the bootstrap admin there are three users: `gamma` (read only),
    /// `editor` (read and post, but not an admin) and `nobody` (no permissions).
    pub async fn with_settings(settings: SecurityServiceSettings) -> Self {
        let directory = HashMapUserDirectory::new();
        bootstrap(
            &directory,
            &settings.default_role().unwrap(),
            settings.bootstrap_admin.as_ref(),
        )
        .await
        .expect("Failed to bootstrap directory");

        let gamma = Role::new(RoleName::parse("Gamma").unwrap())
            .with_permission(Permission::read(SECURITY_RESOURCE));
        let editor = Role::new(RoleName::parse("Editor").unwrap())
            .with_permission(Permission::read(SECURITY_RESOURCE))
            .with_permission(Permission::post(SECURITY_RESOURCE));
        let empty = Role::new(RoleName::parse("Empty").unwrap());
        for role in [&gamma, &editor, &empty] {
            match directory.add_role(role.clone()).await {
                Ok(()) | Err(UserDirectoryError::RoleAlreadyExists) => {}
                Err(e) => panic!("Failed to add role: {e}"),
            }
        }

        for (username, role) in [("gamma", gamma), ("editor", editor), ("nobody", empty)] {
            create_user(&directory, username, role).await;
        }

        let audit = RecordingAuditLogger::default();
        let service = SecurityService::new(directory.clone(), audit.clone(), &settings)
            .expect("Failed to build security service");

        let listener = TcpListener::bind(settings.server.address.as_str())
            .await
            .expect("Failed to bind listener");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let _ = tokio::spawn(service.run_standalone(listener, settings.allowed_origins.clone()));

        Self {
            address,
            http_client: reqwest::Client::new(),
            directory,
            audit,
            csrf_header: settings.csrf.header_name,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.address, API_ROOT, path)
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.http_client
            .post(self.url("/login/"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in and return the session token from the response body.
    pub async fn token_for(&self, username: &str) -> String {
        let password = if username == ADMIN_USERNAME {
            ADMIN_PASSWORD
        } else {
            USER_PASSWORD
        };
        let response = self.login(username, password).await;
        assert_eq!(response.status().as_u16(), 200, "login as {username}");

        let body: Value = response.json().await.unwrap();
        body["access_token"].as_str().unwrap().to_owned()
    }

    pub async fn get_csrf_token(&self, token: Option<&str>) -> reqwest::Response {
        let mut request = self.http_client.get(self.url("/csrf_token/"));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_register(&self, token: Option<&str>, body: &Value) -> reqwest::Response {
        self.post_register_raw(token, "application/json", body.to_string(), None)
            .await
    }

    pub async fn post_register_raw(
        &self,
        token: Option<&str>,
        content_type: &str,
        body: String,
        csrf_token: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .http_client
            .post(self.url("/register/"))
            .header("content-type", content_type)
            .body(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(csrf_token) = csrf_token {
            request = request.header(self.csrf_header.as_str(), csrf_token);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit.events()
    }
}

pub async fn create_user<D: UserDirectory>(directory: &D, username: &str, role: Role) {
    directory
        .create_user(NewUser {
            username: Username::parse(username).unwrap(),
            first_name: PersonName::parse("first_name", "Test").unwrap(),
            last_name: PersonName::parse("last_name", "User").unwrap(),
            email: Email::try_from(Secret::from(format!("{username}@example.com"))).unwrap(),
            role,
            password: Password::try_from(Secret::from(USER_PASSWORD.to_owned())).unwrap(),
        })
        .await
        .unwrap();
}

pub fn register_payload(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": email,
        "password": USER_PASSWORD,
    })
}

pub async fn message(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["message"].as_str().unwrap_or_default().to_owned()
}
