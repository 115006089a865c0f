use harn_application::BillService;
use harn_domain::UserId;
use harn_infrastructure::{InMemoryStore, JsonStoreFile, RandomJoinCodeGenerator, SystemClock};
use std::{collections::HashMap, env, path::PathBuf};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_STORE_PATH: &str = "harn-store.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read from the environment; command-line flags take precedence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub user: Option<UserId>,
    pub display_name: Option<String>,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            store_path: non_empty("HARN_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            user: non_empty("HARN_USER").map(UserId::new),
            display_name: non_empty("HARN_NAME"),
            log_filter: non_empty("HARN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    pub fn with_overrides(
        mut self,
        store: Option<PathBuf>,
        user: Option<String>,
        name: Option<String>,
    ) -> Self {
        if let Some(store) = store {
            self.store_path = store;
        }
        if let Some(user) = user {
            self.user = Some(UserId::new(user));
        }
        if let Some(name) = name {
            self.display_name = Some(name);
        }
        self
    }
}

/// Owns the adapters one command runs against.
pub struct App {
    store: InMemoryStore,
    file: JsonStoreFile,
    clock: SystemClock,
    codes: RandomJoinCodeGenerator,
    users: HashMap<UserId, String>,
}

impl App {
    pub fn load(config: &AppConfig) -> anyhow::Result<Self> {
        let file = JsonStoreFile::new(&config.store_path);
        let store = file.load()?;
        let users = match (&config.user, &config.display_name) {
            (Some(user), Some(name)) => HashMap::from([(user.clone(), name.clone())]),
            _ => HashMap::new(),
        };
        Ok(Self {
            store,
            file,
            clock: SystemClock,
            codes: RandomJoinCodeGenerator,
            users,
        })
    }

    pub fn service(&self) -> BillService<'_> {
        BillService::new(
            &self.store,
            &self.store,
            &self.codes,
            &self.clock,
            &self.users,
        )
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.file.save(&self.store)?;
        Ok(())
    }
}

/// Logs go to stderr so command output stays clean. `RUST_LOG` wins over the
/// configured filter.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
