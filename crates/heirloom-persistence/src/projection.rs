// SPDX-FileCopyrightText: 2026 Heirloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only views over one section of the canonical document.
//!
//! A projection remembers the `Arc` of the section it last derived from and
//! only re-runs its derivation when the engine swaps that section out. Edits
//! to other sections keep the pointer, so they cost one pointer comparison.

use std::sync::Arc;

use heirloom_core::error::HeirloomError;
use heirloom_document::{Document, HasData};
use tokio::sync::watch;

type Derive<S, V> = Box<dyn Fn(&S) -> V + Send + Sync>;

pub struct SectionProjection<S, V> {
    source: watch::Receiver<Arc<Document>>,
    select: fn(&Document) -> &Arc<S>,
    derive: Derive<S, V>,
    cached: Option<(Arc<S>, Arc<V>)>,
    recomputes: usize,
}

impl<S, V> std::fmt::Debug for SectionProjection<S, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionProjection")
            .field("cached", &self.cached.is_some())
            .field("recomputes", &self.recomputes)
            .finish()
    }
}

impl<S, V> SectionProjection<S, V> {
    pub fn new(
        source: watch::Receiver<Arc<Document>>,
        select: fn(&Document) -> &Arc<S>,
        derive: impl Fn(&S) -> V + Send + Sync + 'static,
    ) -> Self {
        Self {
            source,
            select,
            derive: Box::new(derive),
            cached: None,
            recomputes: 0,
        }
    }

    /// Current value, derived again only if the section changed.
    pub fn get(&mut self) -> Arc<V> {
        let section = self.current_section();
        if let Some((seen, value)) = &self.cached {
            if Arc::ptr_eq(seen, &section) {
                return Arc::clone(value);
            }
        }
        let value = Arc::new((self.derive)(&section));
        self.recomputes += 1;
        self.cached = Some((section, Arc::clone(&value)));
        value
    }

    /// Waits until the observed section differs from the one behind the last
    /// returned value, then returns the new value.
    ///
    /// Fails only when the engine has been dropped.
    pub async fn changed(&mut self) -> Result<Arc<V>, HeirloomError> {
        loop {
            let section = self.current_section();
            let unchanged = matches!(&self.cached, Some((seen, _)) if Arc::ptr_eq(seen, &section));
            if !unchanged {
                return Ok(self.get());
            }
            self.source
                .changed()
                .await
                .map_err(|_| HeirloomError::Internal("document channel closed".into()))?;
        }
    }

    /// How many times the derivation has run.
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    fn current_section(&mut self) -> Arc<S> {
        let doc = self.source.borrow_and_update();
        Arc::clone((self.select)(&**doc))
    }
}

impl<S: HasData> SectionProjection<S, bool> {
    /// Projection that is `true` while the section holds no data.
    pub fn emptiness(
        source: watch::Receiver<Arc<Document>>,
        select: fn(&Document) -> &Arc<S>,
    ) -> Self {
        Self::new(source, select, |section: &S| !section.has_data())
    }
}

#[cfg(test)]
mod tests {
    use heirloom_document::{FinancialSection, Pet, PetsSection, SectionUpdate};

    use super::*;

    fn pets_with(names: &[&str]) -> SectionUpdate {
        SectionUpdate::Pets(PetsSection {
            pets: names
                .iter()
                .map(|name| Pet {
                    name: (*name).into(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        })
    }

    #[test]
    fn caches_until_section_pointer_changes() {
        let (tx, rx) = watch::channel(Arc::new(Document::default()));
        let mut pet_count = SectionProjection::new(rx, |d| &d.pets, |s: &PetsSection| s.pets.len());

        assert_eq!(*pet_count.get(), 0);
        assert_eq!(*pet_count.get(), 0);
        assert_eq!(pet_count.recompute_count(), 1);

        let next = tx.borrow().with_section(SectionUpdate::Financial(FinancialSection::default()));
        tx.send_replace(Arc::new(next));
        assert_eq!(*pet_count.get(), 0);
        assert_eq!(pet_count.recompute_count(), 1);

        let next = tx.borrow().with_section(pets_with(&["Biscuit"]));
        tx.send_replace(Arc::new(next));
        assert_eq!(*pet_count.get(), 1);
        assert_eq!(pet_count.recompute_count(), 2);
    }

    #[test]
    fn emptiness_tracks_has_data() {
        let (tx, rx) = watch::channel(Arc::new(Document::default()));
        let mut empty = SectionProjection::emptiness(rx, |d| &d.pets);
        assert!(*empty.get());

        let next = tx.borrow().with_section(pets_with(&["Biscuit"]));
        tx.send_replace(Arc::new(next));
        assert!(!*empty.get());
    }

    #[tokio::test]
    async fn changed_skips_edits_to_other_sections() {
        let (tx, rx) = watch::channel(Arc::new(Document::default()));
        let mut names = SectionProjection::new(rx, |d| &d.pets, |s: &PetsSection| {
            s.pets.iter().map(|p| p.name.clone()).collect::<Vec<_>>()
        });
        names.get();

        let waiter = tokio::spawn(async move {
            let value = names.changed().await.unwrap();
            (value, names.recompute_count())
        });

        let other = tx.borrow().with_section(SectionUpdate::Financial(FinancialSection::default()));
        tx.send_replace(Arc::new(other));
        tokio::task::yield_now().await;
        let pets = tx.borrow().with_section(pets_with(&["Biscuit", "Mochi"]));
        tx.send_replace(Arc::new(pets));

        let (value, recomputes) = waiter.await.unwrap();
        assert_eq!(*value, vec!["Biscuit".to_string(), "Mochi".to_string()]);
        assert_eq!(recomputes, 2);
    }

    #[tokio::test]
    async fn changed_fails_once_sender_is_gone() {
        let (tx, rx) = watch::channel(Arc::new(Document::default()));
        let mut empty = SectionProjection::emptiness(rx, |d| &d.pets);
        empty.get();
        drop(tx);

        let err = empty.changed().await.unwrap_err();
        assert!(matches!(err, HeirloomError::Internal(_)));
    }
}
