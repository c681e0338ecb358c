// src/export.rs
// ============================================================================
// EXPORT - Guardar datos (CSV) e imágenes (TIFF/PNG/JPEG)
// ============================================================================
//
// Imagen:
//   .tif/.tiff -> valores crudos, float32 en escala de grises
//   otros      -> normalizado a u8 con el rango del plano
// Tabla:
//   CSV, una fila por fila del array (1D -> una columna), fin de línea \r\n
//
// ============================================================================

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::GrayImage;
use ndarray::Array2;
use tiff::encoder::{colortype, TiffEncoder};

use crate::contrast::normalize_u8;
use crate::error::{Result, ViewerError};
use crate::number::NumericArray;
use crate::source::ElementKind;
use crate::table::as_2d;

/// Extensión en minúsculas con punto (".png"), vacía si no hay
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Guarda un plano 2D como imagen
pub fn save_image(path: &Path, mat: &Array2<f64>) -> Result<()> {
    let ext = extension_of(path);
    let (height, width) = mat.dim();

    if ext == ".tif" || ext == ".tiff" {
        let data: Vec<f32> = mat.iter().map(|&v| v as f32).collect();
        let file = BufWriter::new(File::create(path)?);
        let mut encoder = TiffEncoder::new(file)?;
        encoder.write_image::<colortype::Gray32Float>(width as u32, height as u32, &data)?;
    } else {
        let levels = normalize_u8(mat.view());
        // El plano es row-major, igual que el buffer de la imagen
        let pixels: Vec<u8> = levels.iter().copied().collect();
        let img = GrayImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
            ViewerError::Unsupported(format!("Invalid image size {}x{}", width, height))
        })?;
        img.save(path)?;
    }

    log::info!("Saved image {}x{} to {}", width, height, path.display());
    Ok(())
}

/// Guarda un array 1D/2D como CSV, con el texto del tipo nativo
pub fn save_table(path: &Path, data: &NumericArray) -> Result<()> {
    let data = as_2d(&data.numbers())?;
    let mut out = BufWriter::new(File::create(path)?);

    for row in data.outer_iter() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.write_all(cells.join(",").as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    out.flush()?;

    log::info!("Saved {}x{} table to {}", data.nrows(), data.ncols(), path.display());
    Ok(())
}

/// Resultado de una petición de guardado (se muestra como aviso)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Overwritten(PathBuf),
    /// Extensión no admitida; contiene el mensaje para el usuario
    BadExtension(&'static str),
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_) | Self::Overwritten(_))
    }
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(p) => write!(f, "File is saved at: {}", p.display()),
            Self::Overwritten(p) => write!(f, "File {} is overwritten", p.display()),
            Self::BadExtension(msg) => f.write_str(msg),
            Self::Failed(err) => f.write_str(err),
        }
    }
}

const IMAGE_EXTENSIONS: [&str; 4] = [".tif", ".jpg", ".png", ".csv"];

fn finish(path: &Path, existed: bool, result: Result<()>) -> SaveOutcome {
    match result {
        Ok(()) if existed => SaveOutcome::Overwritten(path.to_path_buf()),
        Ok(()) => SaveOutcome::Saved(path.to_path_buf()),
        Err(e) => {
            log::warn!("Save to {} failed: {}", path.display(), e);
            SaveOutcome::Failed(e.to_string())
        }
    }
}

/// Petición "Save image": .tif/.jpg/.png como imagen, .csv como tabla
pub fn request_save_image(path: &Path, image: &Array2<f64>, kind: ElementKind) -> SaveOutcome {
    let ext = extension_of(path);
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return SaveOutcome::BadExtension("Please use .tif, .jpg, .png, or .csv as file extension!");
    }

    let existed = path.is_file();
    let result = if ext == ".csv" {
        // El plano llega en f64: se devuelve al tipo del dataset
        save_table(path, &NumericArray::from_f64(kind, image.clone().into_dyn()))
    } else {
        save_image(path, image)
    };
    finish(path, existed, result)
}

/// Petición "Save data": solo CSV; sin extensión se añade .csv
pub fn request_save_data(path: &Path, data: &NumericArray) -> SaveOutcome {
    let mut path = path.to_path_buf();
    let mut ext = extension_of(&path);
    if ext.is_empty() {
        let mut name = path.as_os_str().to_os_string();
        name.push(".csv");
        path = PathBuf::from(name);
        ext = ".csv".to_string();
    }
    if ext != ".csv" {
        return SaveOutcome::BadExtension("Please use .csv as file extension!");
    }

    let existed = path.is_file();
    let result = save_table(&path, data);
    finish(&path, existed, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("/tmp/a.PNG")), ".png");
        assert_eq!(extension_of(Path::new("/tmp/a")), "");
        assert_eq!(extension_of(Path::new("/tmp/a.tar.gz")), ".gz");
    }

    #[test]
    fn test_csv_cells_follow_dtype() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cells.csv");

        let plane = array![[3.0, 1e-5]];
        assert!(request_save_image(&path, &plane, ElementKind::Float).is_saved());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3.0,1e-05\r\n");

        let plane = array![[3.0, 7.0]];
        assert!(request_save_image(&path, &plane, ElementKind::Integer).is_saved());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "3,7\r\n");
    }

    #[test]
    fn test_outcome_messages() {
        let saved = SaveOutcome::Saved(PathBuf::from("/tmp/x.csv"));
        assert_eq!(saved.to_string(), "File is saved at: /tmp/x.csv");
        let over = SaveOutcome::Overwritten(PathBuf::from("/tmp/x.csv"));
        assert_eq!(over.to_string(), "File /tmp/x.csv is overwritten");
        assert!(over.is_saved());
    }

    #[test]
    fn test_bad_extensions() {
        let img = array![[1.0, 2.0]];
        let out = request_save_image(Path::new("/tmp/out.bmp"), &img, ElementKind::Float);
        assert_eq!(out.to_string(), "Please use .tif, .jpg, .png, or .csv as file extension!");

        let data = NumericArray::Float(array![1.0, 2.0].into_dyn());
        let out = request_save_data(Path::new("/tmp/out.txt"), &data);
        assert_eq!(out.to_string(), "Please use .csv as file extension!");
    }
}
