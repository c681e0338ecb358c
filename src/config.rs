// src/config.rs
// ============================================================================
// CONFIG - Parámetros globales del visor
// ============================================================================
//
// Todos los campos tienen default; un JSON parcial solo sobrescribe lo que
// declara. Ejemplo:
//
//   { "dpi": 110, "screen_size": [1440, 2560] }
//
// ============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MARKER_LIST: [&str; 4] = [",", ".", "o", "x"];
pub const CMAP_LIST: [&str; 5] = ["gray", "inferno", "afmhot", "viridis", "magma"];
pub const AXIS_LIST: [usize; 3] = [0, 1, 2];
pub const DISPLAY_TYPE: [&str; 2] = ["plot", "table"];
pub const INPUT_EXT: [&str; 3] = ["hdf", "nxs", "h5"];

/// Configuración del visor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub markers: Vec<String>,
    pub colormaps: Vec<String>,
    pub axes: Vec<usize>,
    pub display_types: Vec<String>,
    /// Periodo de refresco en segundos
    pub update_rate: f64,
    pub dpi: f64,
    /// Relación entre tamaño de figura y pantalla
    pub ratio: f64,
    pub max_fig_size: [f64; 2],
    pub input_extensions: Vec<String>,
    pub plot_color: String,
    /// (alto, ancho) en píxeles
    pub screen_size: [u32; 2],
    /// Por encima de este tamaño en ambas dimensiones no se genera tabla
    pub table_limit: usize,
    /// Umbral para avisar/rechazar cortes lentos en ejes 1 y 2
    pub slice_limit: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            markers: MARKER_LIST.iter().map(|s| s.to_string()).collect(),
            colormaps: CMAP_LIST.iter().map(|s| s.to_string()).collect(),
            axes: AXIS_LIST.to_vec(),
            display_types: DISPLAY_TYPE.iter().map(|s| s.to_string()).collect(),
            update_rate: 0.2,
            dpi: 96.0,
            ratio: 0.65,
            max_fig_size: [12.0, 9.0],
            input_extensions: INPUT_EXT.iter().map(|s| s.to_string()).collect(),
            plot_color: "blue".to_string(),
            screen_size: [1080, 1920],
            table_limit: 1000,
            slice_limit: 1000,
        }
    }
}

impl ViewerConfig {
    /// Lee la configuración desde un JSON
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("No config found at {}", path.display());
        }

        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: ViewerConfig = serde_json::from_str(&data)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Tamaño de figura en pulgadas (ancho, alto), acotado por max_fig_size
    pub fn figure_size(&self) -> (f64, f64) {
        let [sc_height, sc_width] = self.screen_size;
        let fig_w = self.ratio * sc_width as f64 / self.dpi;
        let fig_h = self.ratio * sc_height as f64 / self.dpi;
        (fig_w.min(self.max_fig_size[0]), fig_h.min(self.max_fig_size[1]))
    }

    /// Comprueba si un nombre de archivo tiene una extensión de entrada válida
    pub fn accepts(&self, file_name: &str) -> bool {
        has_extension(file_name, &self.input_extensions)
    }
}

/// Comparación de extensión insensible a mayúsculas (última parte tras '.')
pub fn has_extension(file_name: &str, allowed: &[String]) -> bool {
    let ext = file_name.rsplit('.').next().unwrap_or("").to_lowercase();
    allowed.iter().any(|a| a.to_lowercase() == ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.markers, vec![",", ".", "o", "x"]);
        assert_eq!(config.colormaps[0], "gray");
        assert_eq!(config.axes, vec![0, 1, 2]);
        assert_eq!(config.input_extensions, vec!["hdf", "nxs", "h5"]);
    }

    #[test]
    fn test_figure_size_clamped() {
        let config = ViewerConfig::default();
        let (w, h) = config.figure_size();
        // 0.65 * 1920 / 96 = 13 -> 12
        assert_eq!(w, 12.0);
        // 0.65 * 1080 / 96 = 7.3125
        assert!((h - 7.3125).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "dpi": 130.0, "screen_size": [768, 1024] }"#).unwrap();
        assert_eq!(config.dpi, 130.0);
        assert_eq!(config.screen_size, [768, 1024]);
        assert_eq!(config.table_limit, 1000);
        assert_eq!(config.plot_color, "blue");
    }

    #[test]
    fn test_accepts() {
        let config = ViewerConfig::default();
        assert!(config.accepts("scan_0001.nxs"));
        assert!(config.accepts("DATA.H5"));
        assert!(!config.accepts("notes.txt"));
    }

    #[test]
    fn test_load_missing() {
        assert!(ViewerConfig::load(Path::new("/nonexistent/h5view.json")).is_err());
    }
}
