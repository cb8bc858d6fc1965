//! # Climate Monitor
//!
//! Lê um DHT22 em intervalo fixo, acende o LED quando a temperatura passa
//! do threshold e grava o histórico em CSV.
//!
//! ## Uso
//! ```bash
//! climate_monitor                         # config.toml ao lado do executável
//! climate_monitor --config /etc/dht.toml  # config explícita
//! ```

mod devices;

use climate_core::config::AppConfig;
use climate_core::{Monitor, OutputDevice, SensorDevice, SystemClock};
use devices::{ConsoleIndicator, IioDht22, SimulatedDht22, SysfsLed};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = config_path_from_args(std::env::args().skip(1))
        .unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        std::process::exit(2);
    }

    // ── Dispositivos ──
    let sensor = match open_sensor(&config) {
        Ok(sensor) => sensor,
        Err(e) => {
            error!("Falha ao inicializar sensor: {e}");
            std::process::exit(1);
        }
    };
    let led = match open_led(&config) {
        Ok(led) => led,
        Err(e) => {
            error!("Falha ao inicializar LED: {e}");
            std::process::exit(1);
        }
    };

    print_banner(&config);

    // ── Loop principal ──
    let mut monitor = Monitor::from_config(&config, sensor, led, SystemClock::new());
    monitor.run()
}

/// Extrai `--config <path>` (ou `--config=<path>`) dos argumentos.
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn open_sensor(config: &AppConfig) -> Result<Box<dyn SensorDevice>, String> {
    match config.sensor.source.as_str() {
        "iio" => Ok(Box::new(IioDht22::open(Path::new(&config.sensor.iio_device))?)),
        _ => Ok(Box::new(SimulatedDht22::new(
            config.monitor.threshold_c - 1.0,
            50.0,
        ))),
    }
}

fn open_led(config: &AppConfig) -> Result<Box<dyn OutputDevice>, String> {
    if config.indicator.led_path.is_empty() {
        Ok(Box::new(ConsoleIndicator::default()))
    } else {
        Ok(Box::new(SysfsLed::open(Path::new(&config.indicator.led_path))?))
    }
}

fn print_banner(config: &AppConfig) {
    println!();
    println!("══════════════════════════════════════════════");
    println!("   🌡  CLIMATE MONITOR – ATIVO");
    println!("══════════════════════════════════════════════");
    println!("  Sensor:    {}", config.sensor.source);
    println!("  Threshold: {:.1} C", config.monitor.threshold_c);
    println!("  Leitura:   a cada {:.1}s", config.monitor.poll_interval_secs);
    if config.logging.enabled {
        println!("  Log:       {}", config.logging.path);
        println!("  Intervalo: {:.0}s", config.logging.interval_secs);
    } else {
        println!("  Log:       desabilitado");
    }
    println!("══════════════════════════════════════════════");
    println!();
    info!("Monitor inicializado");
}
