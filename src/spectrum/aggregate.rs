//! Combined ("Total") traces across a batch of gases.
//!
//! These are consumer-side folds; the engines never aggregate.

use super::{Spectrum, SpectrumKind, WmsResult};

/// Combine a DAS batch into a single trace.
///
/// Absorbance spectra are summed and transmission spectra multiplied.
/// Returns `None` for an empty batch, coefficient spectra, mixed kinds, or
/// spectra of different lengths.
pub fn total_das(spectra: &[Spectrum]) -> Option<Vec<f64>> {
    let first = spectra.first()?;
    let len = first.len();
    if spectra.iter().any(|s| s.kind != first.kind || s.len() != len) {
        return None;
    }

    match first.kind {
        SpectrumKind::Absorbance => Some(spectra.iter().fold(vec![0.0; len], |mut acc, s| {
            acc.iter_mut().zip(&s.values).for_each(|(a, v)| *a += v);
            acc
        })),
        SpectrumKind::Transmission => Some(spectra.iter().fold(vec![1.0; len], |mut acc, s| {
            acc.iter_mut().zip(&s.values).for_each(|(a, v)| *a *= v);
            acc
        })),
        SpectrumKind::Coefficient => None,
    }
}

/// Sum a WMS batch into a single trace.
///
/// Returns `None` for an empty batch or results of different lengths.
pub fn total_wms(results: &[WmsResult]) -> Option<Vec<f64>> {
    let len = results.first()?.len();
    if results.iter().any(|r| r.len() != len) {
        return None;
    }
    Some(results.iter().fold(vec![0.0; len], |mut acc, r| {
        acc.iter_mut().zip(&r.values).for_each(|(a, v)| *a += v);
        acc
    }))
}
