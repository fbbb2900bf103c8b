//! Settings built purely from environment variables

use tributary_core::{
    DatabaseConfig, DocumentsConfig, IndexConfig, LlmConfig, OrchestratorConfig, ServerConfig,
    Settings, TributaryError,
};
use tributary_types::Engine;

/// Gate applied to the PostgreSQL branch when `POSTGRES_KEYWORDS` is unset
pub const DEFAULT_POSTGRES_KEYWORDS: &[&str] = &["event_amount", "event_expenses"];

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads settings from `OPENAI_*`, `PINECONE_*`, `POSTGRES_*`, `MYSQL_*` and friends
pub struct EnvLoader {
    lookup: Lookup,
}

/// Collects required values so every missing one is reported at once
struct Reader<'a> {
    loader: &'a EnvLoader,
    missing: Vec<&'static str>,
    invalid: Vec<String>,
}

impl<'a> Reader<'a> {
    fn optional(&self, name: &str) -> Option<String> {
        (self.loader.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, name: &'static str) -> String {
        self.required_or(name, None)
    }

    /// Like `required`, but an older variable name is accepted when the
    /// current one is unset; only the current name is reported as missing
    fn required_or(&mut self, name: &'static str, legacy: Option<&str>) -> String {
        match self.optional_or(name, legacy) {
            Some(value) => value,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    fn optional_or(&self, name: &str, legacy: Option<&str>) -> Option<String> {
        self.optional(name)
            .or_else(|| legacy.and_then(|legacy| self.optional(legacy)))
    }

    fn parsed<T: std::str::FromStr>(&mut self, name: &'static str) -> Option<T> {
        let raw = self.optional(name)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid.push(format!("{}={}", name, raw));
                None
            }
        }
    }

    fn list(&self, name: &str) -> Option<Vec<String>> {
        self.optional(name).map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }

    fn database(&mut self, prefix: &'static str, engine: Engine) -> DatabaseConfig {
        // Names are static so they can be reported verbatim when missing
        let (user, password, host, port, database, keywords) = match prefix {
            "POSTGRES" => (
                "POSTGRES_USER",
                "POSTGRES_PASSWORD",
                "POSTGRES_HOST",
                "POSTGRES_PORT",
                "POSTGRES_DATABASE",
                "POSTGRES_KEYWORDS",
            ),
            _ => (
                "MYSQL_USER",
                "MYSQL_PASSWORD",
                "MYSQL_HOST",
                "MYSQL_PORT",
                "MYSQL_DATABASE",
                "MYSQL_KEYWORDS",
            ),
        };

        // Older deployments spell the PostgreSQL prefix `POSTSQL_`
        let legacy = |name: &str| match engine {
            Engine::Postgres => Some(name.replacen("POSTGRES_", "POSTSQL_", 1)),
            Engine::Mysql => None,
        };

        let mut config = DatabaseConfig::new(engine.to_string(), engine).with_connection(
            self.required_or(host, legacy(host).as_deref()),
            self.required_or(user, legacy(user).as_deref()),
            self.optional_or(password, legacy(password).as_deref())
                .unwrap_or_default(),
            self.required_or(database, legacy(database).as_deref()),
        );
        config.port = self.parsed(port);
        config.keywords = self.list(keywords).unwrap_or_else(|| match engine {
            Engine::Postgres => DEFAULT_POSTGRES_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            Engine::Mysql => Vec::new(),
        });
        config
    }
}

impl EnvLoader {
    /// Loader reading the process environment (after loading `.env`)
    pub fn new() -> Self {
        let _ = dotenvy::dotenv();
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Loader with a custom variable source
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Build settings; engine A is PostgreSQL and engine B is MySQL
    pub fn load(&self) -> Result<Settings, TributaryError> {
        let mut r = Reader {
            loader: self,
            missing: Vec::new(),
            invalid: Vec::new(),
        };

        let mut llm = LlmConfig::new(r.required("OPENAI_API_KEY"));
        if let Some(base_url) = r.optional("OPENAI_BASE_URL") {
            llm.base_url = base_url;
        }
        if let Some(model) = r.optional("OPENAI_MODEL") {
            llm.model = model;
        }
        if let Some(model) = r.optional("EMBEDDING_MODEL") {
            llm.embedding_model = model;
        }

        let mut index = IndexConfig::new(r.required("PINECONE_API_KEY"), r.required("INDEX_NAME"));
        if let Some(url) = r.optional("PINECONE_CONTROL_URL") {
            index.control_url = url;
        }
        if let Some(top_k) = r.parsed("RETRIEVER_TOP_K") {
            index.top_k = top_k;
        }

        let mut documents = DocumentsConfig::new(r.required("DATA_DIR_PATH"));
        if let Some(size) = r.parsed("CHUNK_SIZE") {
            documents.chunk_size = size;
        }
        if let Some(overlap) = r.parsed("CHUNK_OVERLAP") {
            documents.chunk_overlap = overlap;
        }

        let engine_a = r.database("POSTGRES", Engine::Postgres);
        let engine_b = r.database("MYSQL", Engine::Mysql);

        let server = ServerConfig {
            port: r.parsed("PORT"),
            request_timeout_secs: r.parsed("REQUEST_TIMEOUT_SECS"),
        };
        let orchestrator = OrchestratorConfig {
            branch_timeout_secs: r.parsed("BRANCH_TIMEOUT_SECS"),
        };

        if !r.missing.is_empty() {
            return Err(TributaryError::Config(format!(
                "Missing required environment variables: {}",
                r.missing.join(", ")
            )));
        }
        if !r.invalid.is_empty() {
            return Err(TributaryError::Config(format!(
                "Invalid environment values: {}",
                r.invalid.join(", ")
            )));
        }

        Ok(Settings {
            name: r.optional("TRIBUTARY_NAME").unwrap_or_else(|| "tributary".to_string()),
            llm,
            index,
            documents,
            engine_a,
            engine_b,
            server: Some(server),
            orchestrator: Some(orchestrator),
        })
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new()
    }
}
