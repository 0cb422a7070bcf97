//! One generation run: concepts for a category, then five certificates
//! rendered in slot order.

use crate::assets::AssetSource;
use crate::concept::DesignConcept;
use crate::provider::{ConceptProvider, CONCEPT_COUNT};
use crate::renderer::CertificateRenderer;
use crate::rendering::Certificate;
use crate::{Error, Result};
use log::{error, info};

/// A busy indicator shown for the whole duration of a run
pub trait BusyIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Indicator that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBusyIndicator;

impl BusyIndicator for NoopBusyIndicator {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Shows the indicator on creation and hides it when dropped, so every
/// exit path (including unwinding) clears it.
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    pub fn acquire(indicator: &'a dyn BusyIndicator) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

/// Outcome of one slot
#[derive(Debug)]
pub struct SlotOutcome {
    pub slot: usize,
    pub concept: DesignConcept,
    pub result: Result<Certificate>,
}

/// All slots of a finished run, in slot order
#[derive(Debug)]
pub struct GenerationRun {
    pub category: String,
    pub slots: Vec<SlotOutcome>,
}

impl GenerationRun {
    /// Certificates that rendered successfully
    pub fn certificates(&self) -> impl Iterator<Item = &Certificate> {
        self.slots.iter().filter_map(|s| s.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.slots
            .iter()
            .filter_map(|s| s.result.as_ref().err().map(|e| (s.slot, e)))
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Run one generation for `category`.
///
/// The category is trimmed and must not be empty. Concepts come from
/// `provider`; slots without a concept render with an empty one. A slot
/// that fails to render is logged and recorded, and the remaining slots
/// still run.
pub async fn generate<P, S>(
    category: &str,
    provider: &P,
    renderer: &CertificateRenderer<S>,
    busy: &dyn BusyIndicator,
) -> Result<GenerationRun>
where
    P: ConceptProvider + ?Sized,
    S: AssetSource,
{
    let category = category.trim();
    if category.is_empty() {
        return Err(Error::InvalidCategory);
    }

    let _busy = BusyGuard::acquire(busy);

    let concepts = provider.get_concepts(category).await;
    info!("generating {} certificates for {:?} from {} concepts", CONCEPT_COUNT, category, concepts.len());

    let mut slots = Vec::with_capacity(CONCEPT_COUNT);
    for slot in 0..CONCEPT_COUNT {
        let concept = concepts.get(slot).cloned().unwrap_or_default();
        let result = renderer.render(category, &concept, slot).await;
        if let Err(e) = &result {
            error!("Error generating certificate {}: {}", slot + 1, e);
        }
        slots.push(SlotOutcome { slot, concept, result });
    }

    Ok(GenerationRun {
        category: category.to_string(),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingIndicator {
        shown: AtomicUsize,
        hidden: AtomicUsize,
    }

    impl BusyIndicator for CountingIndicator {
        fn show(&self) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
        fn hide(&self) {
            self.hidden.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn guard_hides_on_drop() {
        let ind = CountingIndicator::default();
        {
            let _g = BusyGuard::acquire(&ind);
            assert_eq!(ind.shown.load(Ordering::SeqCst), 1);
            assert_eq!(ind.hidden.load(Ordering::SeqCst), 0);
        }
        assert_eq!(ind.hidden.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_hides_on_panic() {
        let ind = CountingIndicator::default();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _g = BusyGuard::acquire(&ind);
            panic!("boom");
        }));
        assert!(res.is_err());
        assert_eq!(ind.hidden.load(Ordering::SeqCst), 1);
    }
}
