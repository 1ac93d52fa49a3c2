//! Configuração carregada a partir de `ride.toml`.
//!
//! A struct [`RideConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis. As variáveis de
//! ambiente `RIDE_DATA_FILE` e `RIDE_LOCALE` têm precedência sobre o arquivo.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::i18n::Locale;
use crate::retry::RetryPolicy;

pub const CONFIG_FILE: &str = "ride.toml";

/// Configuração de nível superior carregada de `ride.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RideConfig {
    /// Idioma das mensagens exibidas.
    #[serde(default)]
    pub locale: Locale,

    /// Documento JSON usado como armazenamento.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Limite de tempo de cada chamada ao armazenamento.
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Máximo de retentativas de falhas transitórias.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Atraso base em milissegundos para backoff exponencial.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("ride-data.json")
}

fn default_store_timeout_ms() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    100
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            data_file: default_data_file(),
            store_timeout_ms: default_store_timeout_ms(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl RideConfig {
    /// Carrega `ride.toml` do diretório atual, ou os defaults se não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<RideConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(data_file) = std::env::var("RIDE_DATA_FILE")
            && !data_file.is_empty()
        {
            config.data_file = PathBuf::from(data_file);
        }
        if let Ok(locale) = std::env::var("RIDE_LOCALE")
            && !locale.is_empty()
        {
            config.locale = locale.parse().map_err(|e: String| anyhow!(e))?;
        }

        Ok(config)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
        }
    }
}
