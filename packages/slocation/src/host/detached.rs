use crate::{LocationSnapshot, NavigationError};

use super::{ChangeHandler, ChangeListener, HistoryState, LocationHost};

/// A [`LocationHost`] for environments without any navigation stack, such as servers, workers
/// or tests that don't care about the location.
///
/// It always reports the empty [`LocationSnapshot`], never attaches listeners and accepts every
/// mutation without doing anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedHost;

impl LocationHost for DetachedHost {
    fn current_snapshot(&self) -> LocationSnapshot {
        LocationSnapshot::default()
    }

    fn push_entry(
        &self,
        _data: HistoryState,
        _title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        tracing::debug!(?url, "ignoring pushState without a navigation stack");
        Ok(())
    }

    fn replace_entry(
        &self,
        _data: HistoryState,
        _title: &str,
        url: Option<&str>,
    ) -> Result<(), NavigationError> {
        tracing::debug!(?url, "ignoring replaceState without a navigation stack");
        Ok(())
    }

    fn on_change(&self, _handler: ChangeHandler) -> Option<ChangeListener> {
        None
    }

    fn depth(&self) -> usize {
        0
    }
}
