// src/display/viewer.rs
// ============================================================================
// VIEWER - Máquina de estados que decide qué mostrar
// ============================================================================
//
// refresh() se llama en cada sondeo de la interfaz:
//
//   1. Sin archivo o clave      -> frame vacío, reset
//   2. Controles sin cambios    -> None (no se recalcula nada)
//   3. Clasificar el dataset    -> escalar | 1D/2D | 3D | no mostrable
//
// El plano 3D se cachea por (archivo, clave, eje, corte) para que mover
// los sliders de contraste no vuelva a leer del archivo.
//
// ============================================================================

use std::path::Path;

use ndarray::Array2;

use super::{Controls, DisplayType, Frame, Widgets};
use crate::classify::{classify, DataValue};
use crate::config::ViewerConfig;
use crate::contrast::{apply_contrast, LEVEL_MAX, LEVEL_MIN};
use crate::error::Result;
use crate::export::{self, SaveOutcome};
use crate::number::NumericArray;
use crate::plot::{plot_series, PlotKind};
use crate::slice::plan_slice;
use crate::source::{ElementKind, HdfSource};
use crate::table::format_table;

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlaneKey {
    file: String,
    key: String,
    axis: usize,
    index: usize,
}

/// Estado completo del visor
#[derive(Debug, Clone)]
pub struct Viewer {
    config: ViewerConfig,
    controls: Controls,
    value_text: String,
    widgets: Widgets,
    frame: Frame,
    /// Controles del último refresco procesado
    last_state: Option<Controls>,
    plane_cache: Option<(PlaneKey, Array2<f64>)>,
    /// Datos 1D/2D mostrados (para "Save data")
    data: Option<NumericArray>,
    /// Plano 3D sin contraste (para "Save image")
    image: Option<(Array2<f64>, ElementKind)>,
    notices: Vec<String>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            controls: Controls::default(),
            value_text: String::new(),
            widgets: Widgets::idle(),
            frame: Frame::Empty,
            last_state: None,
            plane_cache: None,
            data: None,
            image: None,
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    pub fn widgets(&self) -> &Widgets {
        &self.widgets
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Avisos pendientes (se vacían al leerlos)
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::info!("{}", message);
        self.notices.push(message);
    }

    /// Vuelve al estado inicial. Con `keep_display` se conservan archivo,
    /// clave y texto del valor.
    fn reset(&mut self, keep_display: bool) {
        if keep_display {
            self.controls.reset_view();
        } else {
            self.controls = Controls::default();
            self.value_text.clear();
        }
        self.widgets = Widgets::idle();
        self.data = None;
        self.image = None;
    }

    /// Niveles de contraste por defecto
    pub fn reset_min_max(&mut self) {
        self.controls.min = LEVEL_MIN;
        self.controls.max = LEVEL_MAX;
    }

    /// Se cerró `path`: si es lo que se muestra (o no hay nada), reset
    pub fn close_file(&mut self, path: &str) {
        if self.controls.file.is_empty() || self.controls.file == path {
            log::debug!("Closing {}", path);
            self.reset(false);
            self.frame = Frame::Empty;
            self.last_state = None;
            self.plane_cache = None;
        }
    }

    /// Recalcula el frame si los controles cambiaron.
    ///
    /// Devuelve None cuando no hubo nada que hacer.
    pub fn refresh<S: HdfSource + ?Sized>(&mut self, source: &S) -> Option<&Frame> {
        if !self.controls.has_selection() {
            self.value_text.clear();
            self.frame = Frame::Empty;
            self.reset(true);
            // Volver a elegir la misma clave debe redibujar
            self.last_state = None;
            return Some(&self.frame);
        }

        if self.last_state.as_ref() == Some(&self.controls) {
            return None;
        }

        log::debug!("Refreshing {}:{}", self.controls.file, self.controls.key);
        if let Err(e) = self.dispatch(source) {
            log::warn!("Display of {} failed: {}", self.controls.key, e);
            self.reset(false);
            self.frame = Frame::Empty;
            self.notify(format!("Error {}", e));
        }

        self.last_state = Some(self.controls.clone());
        Some(&self.frame)
    }

    fn dispatch<S: HdfSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let key = self.controls.key.clone();
        let value = classify(source, &key)?;
        self.value_text = value.value_text();

        match value {
            DataValue::Array { dtype, shape } => match shape.len() {
                3 => self.display_3d(source, &key, dtype, [shape[0], shape[1], shape[2]]),
                1 | 2 => self.display_1d_2d(source, &key),
                n => {
                    self.notify(format!("Can't display {}-d array!", n));
                    self.frame = Frame::Empty;
                    self.reset(true);
                    Ok(())
                }
            },
            other => {
                log::debug!("{} is a {}", key, other.kind_name());
                self.frame = Frame::Scalar { text: self.value_text.clone() };
                self.reset(true);
                Ok(())
            }
        }
    }

    fn display_3d<S: HdfSource + ?Sized>(
        &mut self,
        source: &S,
        key: &str,
        dtype: ElementKind,
        shape: [usize; 3],
    ) -> Result<()> {
        let plan = plan_slice(shape, self.controls.axis, self.controls.slice, self.config.slice_limit);
        if let Some(notice) = plan.notice.clone() {
            self.notify(notice);
        }
        self.controls.axis = plan.axis;
        self.controls.slice = plan.index;

        let plane_key = PlaneKey {
            file: self.controls.file.clone(),
            key: key.to_string(),
            axis: plan.axis,
            index: plan.index,
        };
        let cached = match &self.plane_cache {
            Some((cached, plane)) if *cached == plane_key => Some(plane.clone()),
            _ => None,
        };
        let plane = match cached {
            Some(plane) => plane,
            None => {
                log::debug!("Reading plane {} of axis {} from {}", plan.index, plan.axis, key);
                let plane = source.read_slice(key, plan.axis, plan.index)?;
                self.plane_cache = Some((plane_key, plane.clone()));
                plane
            }
        };

        let contrast = apply_contrast(plane.view(), self.controls.min, self.controls.max);
        self.controls.min = contrast.min;
        self.controls.max = contrast.max;

        self.widgets = Widgets::volume(plan.max_index);
        self.data = None;
        self.image = Some((plane, dtype));
        self.frame = Frame::Image3d {
            image: contrast.image,
            cmap: self.controls.cmap,
            axis: plan.axis,
            index: plan.index,
            slice_max: plan.max_index,
            min: contrast.min,
            max: contrast.max,
        };
        Ok(())
    }

    fn display_1d_2d<S: HdfSource + ?Sized>(&mut self, source: &S, key: &str) -> Result<()> {
        // Tabla y CSV usan el tipo nativo; el gráfico, f64
        let data = source.read_numeric(key)?;
        let rank = data.ndim();

        // Al pasar de 3D a 1D/2D se reponen eje, paleta y sliders
        let display = self.controls.display;
        let marker = std::mem::take(&mut self.controls.marker);
        self.controls.reset_view();
        self.controls.display = display;
        self.controls.marker = marker;

        self.frame = match display {
            DisplayType::Table => {
                let table = format_table(&data, self.config.table_limit)?;
                Frame::Table { rank, table }
            }
            DisplayType::Plot => match plot_series(&data.to_f64(), key)? {
                PlotKind::Line(series) => Frame::Plot {
                    rank,
                    series,
                    marker: self.controls.marker.clone(),
                    color: self.config.plot_color.clone(),
                },
                PlotKind::Image(image) => Frame::Image2d { image, cmap: self.controls.cmap },
            },
        };

        self.widgets = Widgets::series(display);
        self.image = None;
        self.data = Some(data);
        Ok(())
    }

    /// "Save image": solo con un volumen 3D en pantalla
    pub fn request_save_image(&self, path: &Path) -> Option<SaveOutcome> {
        let (image, dtype) = self.image.as_ref()?;
        Some(export::request_save_image(path, image, *dtype))
    }

    /// "Save data": solo con datos 1D/2D en pantalla
    pub fn request_save_data(&self, path: &Path) -> Option<SaveOutcome> {
        let data = self.data.as_ref()?;
        Some(export::request_save_data(path, data))
    }
}
