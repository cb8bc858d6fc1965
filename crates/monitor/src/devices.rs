//! Adaptadores de hardware – sensor e LED.
//!
//! **Sensor:**
//! - `IioDht22` — DHT22 via driver `dht11` do kernel (IIO em sysfs)
//! - `SimulatedDht22` — random walk com falhas ocasionais, para desktop
//!
//! **LED:**
//! - `SysfsLed` — arquivo `brightness` em `/sys/class/leds/...`
//! - `ConsoleIndicator` — só registra as transições no log

use climate_core::{OutputDevice, SensorDevice, TransportError};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ──────────────────────────────────────────
// DHT22 via IIO
// ──────────────────────────────────────────

/// DHT22 exposto pelo subsistema IIO.
///
/// O driver publica `in_temp_input` (m°C) e `in_humidityrelative_input`
/// (m%). Cada leitura dispara uma conversão; `EIO`/`ETIMEDOUT` são comuns
/// e viram [`TransportError`].
pub struct IioDht22 {
    temp_path: PathBuf,
    hum_path: PathBuf,
    temp: Option<f32>,
    hum: Option<f32>,
}

impl IioDht22 {
    /// Abre o diretório do device; falha se os atributos não existem.
    pub fn open(device_dir: &Path) -> Result<Self, String> {
        let temp_path = device_dir.join("in_temp_input");
        let hum_path = device_dir.join("in_humidityrelative_input");

        for p in [&temp_path, &hum_path] {
            if !p.exists() {
                return Err(format!("atributo IIO ausente: {}", p.display()));
            }
        }

        info!("✓ DHT22 (IIO) em {}", device_dir.display());
        Ok(Self {
            temp_path,
            hum_path,
            temp: None,
            hum: None,
        })
    }
}

impl SensorDevice for IioDht22 {
    fn measure(&mut self) -> Result<(), TransportError> {
        self.temp = None;
        self.hum = None;

        let temp_raw = read_attr(&self.temp_path)?;
        let hum_raw = read_attr(&self.hum_path)?;

        // Valor ilegível → leitura ausente (falha de validação, não de transporte)
        self.temp = parse_milli(&temp_raw);
        self.hum = parse_milli(&hum_raw);
        debug!("IIO bruto: temp={temp_raw:?} hum={hum_raw:?}");
        Ok(())
    }

    fn last_temperature(&self) -> Option<f32> {
        self.temp
    }

    fn last_humidity(&self) -> Option<f32> {
        self.hum
    }
}

fn read_attr(path: &Path) -> Result<String, TransportError> {
    std::fs::read_to_string(path)
        .map_err(|e| TransportError(format!("{}: {e}", path.display())))
}

/// Converte milésimos ("23400") para unidade (23.4).
fn parse_milli(raw: &str) -> Option<f32> {
    raw.trim().parse::<i64>().ok().map(|v| v as f32 / 1000.0)
}

// ──────────────────────────────────────────
// Sensor simulado
// ──────────────────────────────────────────

/// Probabilidade de uma medição falhar por transporte.
const SIM_FAULT_RATE: f64 = 0.05;
/// Probabilidade de uma medição devolver lixo.
const SIM_GARBAGE_RATE: f64 = 0.03;

/// DHT22 simulado: temperatura e umidade com deriva lenta.
pub struct SimulatedDht22 {
    rng: ThreadRng,
    base_temp: f32,
    base_hum: f32,
    temp: Option<f32>,
    hum: Option<f32>,
}

impl SimulatedDht22 {
    pub fn new(base_temp: f32, base_hum: f32) -> Self {
        info!("Sensor simulado (base {base_temp:.1}°C / {base_hum:.1}%)");
        Self {
            rng: rand::thread_rng(),
            base_temp,
            base_hum,
            temp: None,
            hum: None,
        }
    }
}

impl SensorDevice for SimulatedDht22 {
    fn measure(&mut self) -> Result<(), TransportError> {
        if self.rng.gen_bool(SIM_FAULT_RATE) {
            self.temp = None;
            self.hum = None;
            return Err(TransportError("ETIMEDOUT (simulado)".into()));
        }

        self.base_temp = (self.base_temp + self.rng.gen_range(-0.3..=0.3)).clamp(15.0, 35.0);
        self.base_hum = (self.base_hum + self.rng.gen_range(-1.0..=1.0)).clamp(20.0, 90.0);

        if self.rng.gen_bool(SIM_GARBAGE_RATE) {
            // Bit trocado no frame: valor absurdo que a validação deve rejeitar
            self.temp = Some(self.base_temp + 200.0);
            self.hum = Some(self.base_hum);
        } else {
            self.temp = Some(self.base_temp);
            self.hum = Some(self.base_hum);
        }
        Ok(())
    }

    fn last_temperature(&self) -> Option<f32> {
        self.temp
    }

    fn last_humidity(&self) -> Option<f32> {
        self.hum
    }
}

// ──────────────────────────────────────────
// LEDs
// ──────────────────────────────────────────

/// LED controlado por `/sys/class/leds/<nome>/brightness`.
pub struct SysfsLed {
    brightness: PathBuf,
}

impl SysfsLed {
    pub fn open(brightness: &Path) -> Result<Self, String> {
        if !brightness.exists() {
            return Err(format!("LED não encontrado: {}", brightness.display()));
        }
        info!("✓ LED em {}", brightness.display());
        Ok(Self {
            brightness: brightness.to_path_buf(),
        })
    }
}

impl OutputDevice for SysfsLed {
    fn set(&mut self, on: bool) {
        let value = if on { "1" } else { "0" };
        if let Err(e) = std::fs::write(&self.brightness, value) {
            warn!("Falha ao escrever {}: {e}", self.brightness.display());
        }
    }
}

/// Indicador sem hardware: registra as mudanças de estado.
#[derive(Default)]
pub struct ConsoleIndicator {
    on: Option<bool>,
}

impl OutputDevice for ConsoleIndicator {
    fn set(&mut self, on: bool) {
        if self.on != Some(on) {
            info!("LED {}", if on { "ON" } else { "OFF" });
            self.on = Some(on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_iio(temp: &str, hum: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("in_temp_input"), temp).unwrap();
        std::fs::write(dir.path().join("in_humidityrelative_input"), hum).unwrap();
        dir
    }

    #[test]
    fn parse_milli_units() {
        assert_eq!(parse_milli("23400\n"), Some(23.4));
        assert_eq!(parse_milli("-5000"), Some(-5.0));
        assert_eq!(parse_milli("abc"), None);
    }

    #[test]
    fn iio_reads_both_channels() {
        let dir = fake_iio("22400\n", "48700\n");
        let mut sensor = IioDht22::open(dir.path()).unwrap();
        sensor.measure().unwrap();
        assert_eq!(sensor.last_temperature(), Some(22.4));
        assert_eq!(sensor.last_humidity(), Some(48.7));
    }

    #[test]
    fn iio_garbage_is_missing_value() {
        let dir = fake_iio("", "48700");
        let mut sensor = IioDht22::open(dir.path()).unwrap();
        sensor.measure().unwrap();
        assert_eq!(sensor.last_temperature(), None);
    }

    #[test]
    fn iio_vanished_attribute_is_transport_fault() {
        let dir = fake_iio("22400", "48700");
        let mut sensor = IioDht22::open(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join("in_humidityrelative_input")).unwrap();
        assert!(sensor.measure().is_err());
        assert_eq!(sensor.last_temperature(), None);
        assert_eq!(sensor.last_humidity(), None);
    }

    #[test]
    fn iio_open_requires_attributes() {
        let dir = TempDir::new().unwrap();
        assert!(IioDht22::open(dir.path()).is_err());
    }

    #[test]
    fn simulated_values_stay_in_band() {
        let mut sim = SimulatedDht22::new(24.0, 50.0);
        for _ in 0..500 {
            if sim.measure().is_ok() {
                let t = sim.last_temperature().unwrap();
                let h = sim.last_humidity().unwrap();
                assert!((15.0..=35.0).contains(&t) || t > 200.0, "t={t}");
                assert!((20.0..=90.0).contains(&h), "h={h}");
            }
        }
    }

    #[test]
    fn sysfs_led_writes_brightness() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brightness");
        std::fs::write(&path, "0").unwrap();

        let mut led = SysfsLed::open(&path).unwrap();
        led.set(true);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1");
        led.set(false);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0");
    }
}
