// src/colormap.rs
// ============================================================================
// COLORMAP - Paletas para previsualizar imágenes
// ============================================================================

use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use ndarray::ArrayView2;
use rayon::prelude::*;

use crate::contrast::normalize_u8;

/// Paletas disponibles (mismo orden que la lista de la interfaz)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Gray,
    Inferno,
    Afmhot,
    Viridis,
    Magma,
}

// Puntos de control equiespaciados en [0, 1]
const INFERNO: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

const MAGMA: [[u8; 3]; 9] = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 45, 123],
    [59, 82, 139],
    [44, 114, 142],
    [33, 145, 140],
    [40, 174, 128],
    [94, 201, 98],
    [173, 220, 48],
    [253, 231, 37],
];

impl Colormap {
    pub const ALL: [Colormap; 5] = [
        Colormap::Gray,
        Colormap::Inferno,
        Colormap::Afmhot,
        Colormap::Viridis,
        Colormap::Magma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Inferno => "inferno",
            Self::Afmhot => "afmhot",
            Self::Viridis => "viridis",
            Self::Magma => "magma",
        }
    }

    /// Color para una intensidad 0..=255
    pub fn rgb(&self, v: u8) -> [u8; 3] {
        let t = v as f32 / 255.0;
        match self {
            Self::Gray => [v, v, v],
            // afmhot: r = 2t, g = 2t - 0.5, b = 2t - 1
            Self::Afmhot => [
                channel(2.0 * t),
                channel(2.0 * t - 0.5),
                channel(2.0 * t - 1.0),
            ],
            Self::Inferno => interpolate(&INFERNO, t),
            Self::Magma => interpolate(&MAGMA, t),
            Self::Viridis => interpolate(&VIRIDIS, t),
        }
    }

    /// Tabla de 256 colores
    pub fn lut(&self) -> Vec<[u8; 3]> {
        (0..=255u8).map(|v| self.rgb(v)).collect()
    }

    /// Renderiza un plano (autoescalado a su propio rango) como RGB
    pub fn render(&self, plane: ArrayView2<f64>) -> RgbImage {
        let (height, width) = plane.dim();
        let levels: Vec<u8> = normalize_u8(plane).iter().copied().collect();
        let lut = self.lut();

        let mut pixels = vec![0u8; width * height * 3];
        pixels
            .par_chunks_mut(3)
            .zip(levels.par_iter())
            .for_each(|(px, &v)| px.copy_from_slice(&lut[v as usize]));

        // El buffer tiene exactamente width * height * 3 bytes
        RgbImage::from_raw(width as u32, height as u32, pixels)
            .unwrap_or_else(|| RgbImage::new(width as u32, height as u32))
    }
}

fn channel(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn interpolate(anchors: &[[u8; 3]], t: f32) -> [u8; 3] {
    let segments = (anchors.len() - 1) as f32;
    let pos = t.clamp(0.0, 1.0) * segments;
    let i = (pos.floor() as usize).min(anchors.len() - 2);
    let frac = pos - i as f32;
    let (a, b) = (anchors[i], anchors[i + 1]);
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * frac).round() as u8;
    }
    out
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown colormap: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use ndarray::array;

    #[test]
    fn test_endpoints() {
        assert_eq!(Colormap::Gray.rgb(0), [0, 0, 0]);
        assert_eq!(Colormap::Gray.rgb(255), [255, 255, 255]);
        assert_eq!(Colormap::Viridis.rgb(0), VIRIDIS[0]);
        assert_eq!(Colormap::Viridis.rgb(255), VIRIDIS[8]);
        assert_eq!(Colormap::Inferno.rgb(255), [252, 255, 164]);
        assert_eq!(Colormap::Afmhot.rgb(255), [255, 255, 255]);
        assert_eq!(Colormap::Afmhot.rgb(0), [0, 0, 0]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("magma".parse::<Colormap>().unwrap(), Colormap::Magma);
        assert_eq!("GRAY".parse::<Colormap>().unwrap(), Colormap::Gray);
        assert!("jet".parse::<Colormap>().is_err());
        assert_eq!(Colormap::default(), Colormap::Gray);
    }

    #[test]
    fn test_lut_monotonic_gray() {
        let lut = Colormap::Gray.lut();
        assert_eq!(lut.len(), 256);
        assert!(lut.windows(2).all(|w| w[0][0] <= w[1][0]));
    }

    #[test]
    fn test_render_dimensions() {
        let plane = array![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]];
        let img = Colormap::Gray.render(plane.view());
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(2, 1), &Rgb([255, 255, 255]));
    }
}
