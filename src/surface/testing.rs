use crate::config::ToolEntry;
use crate::surface::{DisplaySurface, SurfaceError, SurfaceFactory};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use url::Url;

#[derive(Debug, Default)]
struct Recorded {
    navigations: Vec<(String, String)>,
    visible: BTreeMap<String, bool>,
    created: Vec<String>,
}

/// Shared record of what every surface built by [`recording_factory`] was
/// asked to do.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    inner: Rc<RefCell<Recorded>>,
    refuse: Rc<RefCell<BTreeSet<String>>>,
}

impl SurfaceLog {
    pub fn navigation_count(&self) -> usize {
        self.inner.borrow().navigations.len()
    }

    pub fn navigations(&self, key: &str) -> Vec<String> {
        self.inner
            .borrow()
            .navigations
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, url)| url.clone())
            .collect()
    }

    pub fn visible_keys(&self) -> Vec<String> {
        self.inner
            .borrow()
            .visible
            .iter()
            .filter(|(_, visible)| **visible)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn created(&self) -> Vec<String> {
        self.inner.borrow().created.clone()
    }

    pub fn refuse(&self, key: &str) {
        self.refuse.borrow_mut().insert(key.to_string());
    }
}

pub struct RecordingSurface {
    key: String,
    log: SurfaceLog,
}

impl DisplaySurface for RecordingSurface {
    fn navigate(&mut self, url: &Url) -> Result<(), SurfaceError> {
        if self.log.refuse.borrow().contains(&self.key) {
            return Err(SurfaceError::Refused {
                url: url.to_string(),
                reason: "refused by test".to_string(),
            });
        }
        self.log
            .inner
            .borrow_mut()
            .navigations
            .push((self.key.clone(), url.to_string()));
        Ok(())
    }

    fn set_visible(&mut self, visible: bool) {
        self.log
            .inner
            .borrow_mut()
            .visible
            .insert(self.key.clone(), visible);
    }
}

impl Drop for RecordingSurface {
    fn drop(&mut self) {
        self.log.inner.borrow_mut().visible.remove(&self.key);
    }
}

pub fn recording_factory(log: SurfaceLog) -> Box<dyn SurfaceFactory> {
    Box::new(move |entry: &ToolEntry| -> Box<dyn DisplaySurface> {
        log.inner.borrow_mut().created.push(entry.key.clone());
        Box::new(RecordingSurface {
            key: entry.key.clone(),
            log: log.clone(),
        })
    })
}
