// src/browser.rs
// ============================================================================
// BROWSER - Navegación de directorios para abrir y guardar archivos
// ============================================================================
//
// Lógica de los diálogos "Select file" y "Save": listado filtrado, orden
// (carpetas primero), entrada ".." y creación de carpetas. Los widgets no
// viven aquí.
//
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errores de las acciones del diálogo (mensajes para el usuario)
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("File name cannot be empty!")]
    EmptyFileName,

    #[error("Folder name cannot be empty!")]
    EmptyFolderName,

    #[error("A folder named '{0}' already exists!")]
    FolderExists(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Una fila del listado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

impl DirEntry {
    /// true para la entrada ".." que sube un nivel
    pub fn is_parent(&self) -> bool {
        self.name == ".."
    }
}

/// Resultado de activar (doble clic) una entrada
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Se entró en un directorio
    Entered(PathBuf),
    /// Se eligió un archivo
    Selected(PathBuf),
    /// Diálogo de guardado: el nombre del archivo pasa al campo de nombre
    FileName(String),
}

/// Uso del diálogo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    /// "Select file": activar un archivo lo elige
    #[default]
    Open,
    /// "Save": activar un archivo solo rellena el nombre
    Save,
}

/// Estado de un diálogo de selección/guardado
#[derive(Debug, Clone)]
pub struct DirectoryBrowser {
    path: PathBuf,
    mode: BrowseMode,
    upper_limit: Option<PathBuf>,
    show_hidden: bool,
    allowed_extensions: Option<Vec<String>>,
}

/// Ruta absoluta; "." daría un padre vacío para ".."
fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// Expande "~" al directorio del usuario
pub fn expand_home(path: &Path) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Unidades disponibles (Windows). En otros sistemas solo la raíz.
pub fn available_drives() -> Vec<PathBuf> {
    if cfg!(windows) {
        (b'A'..=b'Z')
            .map(|d| format!("{}:\\", d as char))
            .filter(|d| Path::new(&d[..2]).exists())
            .map(PathBuf::from)
            .collect()
    } else {
        vec![PathBuf::from("/")]
    }
}

impl DirectoryBrowser {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        let mut path = absolute(expand_home(directory.as_ref()));
        // En Windows se arranca en la primera unidad disponible
        if cfg!(windows) {
            if let Some(first) = available_drives().into_iter().next() {
                path = first;
            }
        }
        Self {
            path,
            mode: BrowseMode::Open,
            upper_limit: None,
            show_hidden: false,
            allowed_extensions: None,
        }
    }

    /// Diálogo de guardado en `directory`
    pub fn saver(directory: impl AsRef<Path>) -> Self {
        Self::new(directory).with_mode(BrowseMode::Save)
    }

    pub fn with_mode(mut self, mode: BrowseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    /// No se puede subir por encima de `limit`
    pub fn with_upper_limit(mut self, limit: impl AsRef<Path>) -> Self {
        self.upper_limit = Some(absolute(expand_home(limit.as_ref())));
        self
    }

    pub fn show_hidden(mut self, show: bool) -> Self {
        self.show_hidden = show;
        self
    }

    /// Solo archivos con estas extensiones (sin punto, p.ej. "h5")
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.allowed_extensions = Some(extensions.iter().map(|e| e.to_lowercase()).collect());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cambia de unidad/directorio directamente
    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.path = absolute(path.as_ref().to_path_buf());
    }

    fn check_extension(&self, name: &str) -> bool {
        match &self.allowed_extensions {
            None => true,
            Some(allowed) => {
                let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
                allowed.contains(&ext)
            }
        }
    }

    fn can_go_up(&self) -> bool {
        match &self.upper_limit {
            Some(limit) => self.path != *limit,
            None => self.path.parent().is_some(),
        }
    }

    /// Listado del directorio actual
    pub fn entries(&self) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();

        for item in fs::read_dir(&self.path)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().into_owned();
            if !self.show_hidden && name.starts_with('.') {
                continue;
            }
            let is_dir = item.path().is_dir();
            if !is_dir && !self.check_extension(&name) {
                continue;
            }
            entries.push(DirEntry { name, path: item.path(), is_dir });
        }

        // Carpetas primero, luego por nombre sin distinguir mayúsculas
        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        if self.can_go_up() {
            if let Some(parent) = self.path.parent() {
                entries.insert(
                    0,
                    DirEntry { name: "..".to_string(), path: parent.to_path_buf(), is_dir: true },
                );
            }
        }

        Ok(entries)
    }

    /// Activa una entrada: entra en carpetas; con un archivo, lo elige
    /// (Open) o copia su nombre quedándose en su carpeta (Save)
    pub fn activate(&mut self, entry: &DirEntry) -> Activation {
        if entry.path.is_dir() {
            self.path = entry.path.clone();
            return Activation::Entered(self.path.clone());
        }
        match self.mode {
            BrowseMode::Open => Activation::Selected(entry.path.clone()),
            BrowseMode::Save => {
                if let Some(parent) = entry.path.parent() {
                    self.path = parent.to_path_buf();
                }
                let name = entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry.name.clone());
                Activation::FileName(name)
            }
        }
    }

    /// Ruta de guardado para `file_name` en el directorio actual.
    /// Las barras invertidas se normalizan a '/'.
    pub fn save_path(&self, file_name: &str) -> Result<PathBuf, BrowseError> {
        if file_name.is_empty() {
            return Err(BrowseError::EmptyFileName);
        }
        let joined = self.path.join(file_name);
        Ok(PathBuf::from(joined.to_string_lossy().replace('\\', "/")))
    }

    /// Crea una carpeta dentro del directorio actual
    pub fn create_folder(&self, folder_name: &str) -> Result<PathBuf, BrowseError> {
        if folder_name.is_empty() {
            return Err(BrowseError::EmptyFolderName);
        }
        let new_folder = self.path.join(folder_name);
        if new_folder.exists() {
            return Err(BrowseError::FolderExists(folder_name.to_string()));
        }
        fs::create_dir_all(&new_folder)?;
        log::info!("Created folder {}", new_folder.display());
        Ok(new_folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("scan.NXS"), b"").unwrap();
        fs::write(dir.path().join("b.h5"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join(".hidden.h5"), b"").unwrap();
        dir
    }

    fn names(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_listing_filtered_and_sorted() {
        let dir = fixture();
        let exts = vec!["hdf".to_string(), "nxs".to_string(), "h5".to_string()];
        let browser = DirectoryBrowser::new(dir.path()).with_extensions(&exts);
        let entries = browser.entries().unwrap();
        assert_eq!(names(&entries), vec!["..", "alpha", "Zeta", "b.h5", "scan.NXS"]);
        assert!(entries[0].is_parent());
    }

    #[test]
    fn test_listing_hidden_and_unfiltered() {
        let dir = fixture();
        let browser = DirectoryBrowser::new(dir.path()).show_hidden(true);
        let entries = browser.entries().unwrap();
        assert!(names(&entries).contains(&".hidden.h5"));
        assert!(names(&entries).contains(&"notes.txt"));
    }

    #[test]
    fn test_upper_limit_hides_parent() {
        let dir = fixture();
        let browser = DirectoryBrowser::new(dir.path()).with_upper_limit(dir.path());
        let entries = browser.entries().unwrap();
        assert!(!entries.iter().any(|e| e.is_parent()));
    }

    #[test]
    fn test_activate() {
        let dir = fixture();
        let mut browser = DirectoryBrowser::new(dir.path());
        let entries = browser.entries().unwrap();
        let alpha = entries.iter().find(|e| e.name == "alpha").unwrap();
        assert_eq!(browser.activate(alpha), Activation::Entered(dir.path().join("alpha")));
        assert_eq!(browser.path(), dir.path().join("alpha"));

        let file = DirEntry { name: "b.h5".into(), path: dir.path().join("b.h5"), is_dir: false };
        assert_eq!(browser.activate(&file), Activation::Selected(dir.path().join("b.h5")));
    }

    #[test]
    fn test_saver_activation_fills_name() {
        let dir = fixture();
        let mut browser = DirectoryBrowser::saver(dir.path());
        assert_eq!(browser.mode(), BrowseMode::Save);

        let file = DirEntry { name: "b.h5".into(), path: dir.path().join("b.h5"), is_dir: false };
        assert_eq!(browser.activate(&file), Activation::FileName("b.h5".to_string()));
        assert_eq!(browser.path(), dir.path());
        assert_eq!(browser.save_path("b.h5").unwrap(), dir.path().join("b.h5"));

        // Las carpetas se siguen abriendo
        let alpha = DirEntry { name: "alpha".into(), path: dir.path().join("alpha"), is_dir: true };
        assert_eq!(browser.activate(&alpha), Activation::Entered(dir.path().join("alpha")));
    }

    #[test]
    fn test_relative_start_is_absolute() {
        let browser = DirectoryBrowser::new(".");
        assert!(browser.path().is_absolute());
        assert_eq!(browser.path(), std::env::current_dir().unwrap());

        let entries = browser.entries().unwrap();
        if let Some(parent) = entries.iter().find(|e| e.is_parent()) {
            assert!(!parent.path.as_os_str().is_empty());
            assert!(parent.path.is_dir());
        }

        let mut browser = DirectoryBrowser::new("/");
        browser.set_path(".");
        assert!(browser.path().is_absolute());
    }

    #[test]
    fn test_create_folder() {
        let dir = fixture();
        let browser = DirectoryBrowser::new(dir.path());
        let created = browser.create_folder("exports").unwrap();
        assert!(created.is_dir());

        let err = browser.create_folder("exports").unwrap_err();
        assert_eq!(err.to_string(), "A folder named 'exports' already exists!");
        assert_eq!(
            browser.create_folder("").unwrap_err().to_string(),
            "Folder name cannot be empty!"
        );
    }

    #[test]
    fn test_save_path() {
        let browser = DirectoryBrowser::new("/data/out");
        assert_eq!(browser.save_path("img.png").unwrap(), PathBuf::from("/data/out/img.png"));
        assert!(matches!(browser.save_path(""), Err(BrowseError::EmptyFileName)));
    }
}
