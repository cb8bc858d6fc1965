//! Histórico em CSV (append-only).
//!
//! Formato:
//!
//! ```text
//! ts_s,temp_c,hum_pct
//! 90,22.4,48.7
//! ```
//!
//! O arquivo é aberto, escrito e fechado a cada chamada; nenhum handle
//! fica aberto entre ticks.

use crate::error::LogError;
use crate::types::{LogRecord, SensorReading};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Linha de cabeçalho escrita em arquivos novos.
pub const CSV_HEADER: &str = "ts_s,temp_c,hum_pct";

/// Prefixo que identifica um arquivo já inicializado.
pub const HEADER_PREFIX: &str = "ts_s,";

/// Garante que o arquivo começa com o cabeçalho.
///
/// Se a primeira linha já começa com `ts_s,` nada é feito. Caso contrário
/// (arquivo ausente, ilegível ou com outro cabeçalho) o arquivo é truncado
/// e recebe um cabeçalho novo.
pub fn ensure_header(path: &Path) -> Result<(), LogError> {
    match read_first_line(path) {
        Ok(first) if first.trim_end().starts_with(HEADER_PREFIX) => {
            debug!("Cabeçalho CSV já presente em {}", path.display());
            return Ok(());
        }
        Ok(first) => {
            warn!(
                "Cabeçalho inesperado em {} ({:?}), recriando arquivo",
                path.display(),
                first.trim_end()
            );
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Criando log CSV em {}", path.display());
        }
        Err(e) => {
            warn!("Erro ao ler {}: {e}, recriando arquivo", path.display());
        }
    }

    let mut file = File::create(path).map_err(|source| LogError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    writeln!(file, "{CSV_HEADER}")
        .and_then(|_| file.flush())
        .map_err(|source| LogError::Write {
            path: path.to_path_buf(),
            source,
        })
}

fn read_first_line(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(line)
}

/// Acrescenta uma linha ao CSV.
///
/// Sem retry: uma falha é reportada e o chamador decide.
pub fn append(path: &Path, record: &LogRecord) -> Result<(), LogError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    writeln!(file, "{record}")
        .and_then(|_| file.flush())
        .map_err(|source| LogError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Estado do arquivo entre ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFileState {
    pub header_written: bool,
    /// `None` até a primeira escrita: a primeira leitura sempre é elegível.
    pub last_write: Option<Duration>,
}

/// Log CSV com intervalo mínimo entre escritas.
#[derive(Debug)]
pub struct CsvLog {
    path: PathBuf,
    interval: Duration,
    state: LogFileState,
    entries: u64,
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
            state: LogFileState::default(),
            entries: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> LogFileState {
        self.state
    }

    /// Número de linhas aceitas nesta execução.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Inicializa o cabeçalho (uma vez, no startup).
    pub fn ensure_header(&mut self) -> Result<(), LogError> {
        if self.state.header_written {
            return Ok(());
        }
        ensure_header(&self.path)?;
        self.state.header_written = true;
        Ok(())
    }

    /// `true` se já passou pelo menos `interval` desde a última escrita.
    pub fn should_write(&self, now: Duration) -> bool {
        match self.state.last_write {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        }
    }

    /// Escreve a leitura; o estado só avança se a escrita der certo.
    ///
    /// Se o cabeçalho ainda não foi confirmado (falha no startup), tenta
    /// escrevê-lo antes; nenhuma linha vai para um arquivo sem cabeçalho.
    /// Retorna o número sequencial da entrada.
    pub fn record(&mut self, now: Duration, reading: &SensorReading) -> Result<u64, LogError> {
        self.ensure_header()?;
        append(&self.path, &LogRecord::new(now, reading))?;
        self.state.last_write = Some(now);
        self.entries += 1;
        Ok(self.entries)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
