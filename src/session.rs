//! Sessions - one tab each, a surface plus its child process

use crate::core::RenderSurface;

pub type SessionId = u64;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Surface exists, child not confirmed yet
    Starting,
    Running,
    /// Being torn down after a close request or child exit
    Closing,
    Closed,
}

/// A terminal tab
#[derive(Debug)]
pub struct Session<S> {
    pub id: SessionId,
    pub surface: S,
    pub state: SessionState,
    pub pid: Option<u32>,
}

/// Outcome of an explicit close request
#[derive(Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Refused: it is the only session
    Sole,
    /// Removed; carries the index that became active
    Closed { active: usize },
}

/// Ordered tabs and which one is active.
///
/// An explicit close kills the child, and the child's exit is reported like
/// any other. `pending_close` marks that one exit notification as already
/// handled so it is not treated as a second close.
#[derive(Debug)]
pub struct SessionManager<S> {
    sessions: Vec<Session<S>>,
    active: usize,
    next_id: SessionId,
    pending_close: Option<SessionId>,
}

impl<S> Default for SessionManager<S> {
    fn default() -> Self {
        Self {
            sessions: Vec::new(),
            active: 0,
            next_id: 1,
            pending_close: None,
        }
    }
}

impl<S: RenderSurface> SessionManager<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the id for the next session
    pub fn allocate_id(&mut self) -> SessionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a session in `Starting`; returns its index. Does not activate it.
    pub fn push(&mut self, id: SessionId, surface: S) -> usize {
        self.sessions.push(Session {
            id,
            surface,
            state: SessionState::Starting,
            pid: None,
        });
        self.sessions.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Session<S>> {
        self.sessions.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Session<S>> {
        self.sessions.get_mut(self.active)
    }

    pub fn get(&self, id: SessionId) -> Option<&Session<S>> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session<S>> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session<S>> {
        self.sessions.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session<S>> {
        self.sessions.iter_mut()
    }

    /// Child confirmed started
    pub fn mark_running(&mut self, id: SessionId, pid: u32) {
        if let Some(session) = self.get_mut(id) {
            session.state = SessionState::Running;
            session.pid = Some(pid);
        }
    }

    /// Activate by index. Negative selects the last tab, past-the-end is
    /// ignored. Returns the index when the active tab changed.
    pub fn select(&mut self, index: i64) -> Option<usize> {
        let target = if index < 0 {
            self.sessions.len().checked_sub(1)?
        } else {
            usize::try_from(index).ok().filter(|i| *i < self.sessions.len())?
        };
        if target == self.active {
            return None;
        }
        self.active = target;
        Some(target)
    }

    /// Next tab, stopping at the last
    pub fn next(&mut self) -> Option<usize> {
        if self.active + 1 < self.sessions.len() {
            self.active += 1;
            Some(self.active)
        } else {
            None
        }
    }

    /// Previous tab, stopping at the first
    pub fn prev(&mut self) -> Option<usize> {
        if self.active > 0 {
            self.active -= 1;
            Some(self.active)
        } else {
            None
        }
    }

    /// Close the active session on request. The sole session is never
    /// closed this way.
    pub fn close_active(&mut self) -> CloseOutcome {
        if self.sessions.len() <= 1 {
            return CloseOutcome::Sole;
        }
        let id = self.sessions[self.active].id;
        self.pending_close = Some(id);
        let active = self.remove(id).unwrap_or(self.active);
        CloseOutcome::Closed { active }
    }

    /// Consume the close marker if this exit belongs to an explicit close
    pub fn take_pending_close(&mut self, id: SessionId) -> bool {
        if self.pending_close == Some(id) {
            self.pending_close = None;
            true
        } else {
            false
        }
    }

    /// Tear down and remove a session; returns the new active index.
    ///
    /// Removing the active tab activates the one before it, or the one
    /// after when it was first.
    pub fn remove(&mut self, id: SessionId) -> Option<usize> {
        let position = self.sessions.iter().position(|s| s.id == id)?;
        let mut session = self.sessions.remove(position);
        session.state = SessionState::Closing;
        session.surface.terminate();
        session.state = SessionState::Closed;
        log::debug!("session {} closed", session.id);

        if position < self.active || (position == self.active && self.active > 0) {
            self.active -= 1;
        }
        Some(self.active)
    }

    /// Tab strip for the current state; `None` while there is a single tab
    pub fn tab_strip(&self) -> Option<TabStrip> {
        (self.sessions.len() > 1).then_some(TabStrip {
            count: self.sessions.len(),
            current: self.active,
        })
    }

    /// Kill every child, used on shutdown
    pub fn terminate_all(&mut self) {
        for session in &mut self.sessions {
            session.state = SessionState::Closing;
            session.surface.terminate();
            session.state = SessionState::Closed;
        }
    }
}

/// Tab strip contents: one entry per tab, 1-based labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabStrip {
    pub count: usize,
    pub current: usize,
}

impl TabStrip {
    /// `(" N ", is_current)` for each tab
    pub fn entries(&self) -> impl Iterator<Item = (String, bool)> + '_ {
        (0..self.count).map(move |i| (format!(" {} ", i + 1), i == self.current))
    }

    /// Plain text form, the current tab bracketed
    pub fn plain(&self) -> String {
        let mut text: String = self
            .entries()
            .map(|(label, current)| {
                if current {
                    format!("[{}]", label.trim())
                } else {
                    label
                }
            })
            .collect();
        text.push('~');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FontSpec, Palette, Settings};

    #[derive(Debug, Default)]
    struct Dummy {
        terminated: bool,
    }

    impl RenderSurface for Dummy {
        fn configure(&mut self, _: &Settings, _: &Palette) {}
        fn set_font(&mut self, _: &FontSpec) -> bool {
            true
        }
        fn feed_child(&mut self, _: &[u8]) {}
        fn copy_clipboard(&mut self) {}
        fn paste_clipboard(&mut self) {}
        fn current_directory_uri(&self) -> Option<String> {
            None
        }
        fn window_title(&self) -> Option<String> {
            None
        }
        fn resize(&mut self, _: u16, _: u16) {}
        fn terminate(&mut self) {
            self.terminated = true;
        }
    }

    fn manager(n: usize) -> SessionManager<Dummy> {
        let mut m = SessionManager::new();
        for _ in 0..n {
            let id = m.allocate_id();
            m.push(id, Dummy::default());
        }
        m
    }

    #[test]
    fn test_push_starts_in_starting() {
        let mut m = manager(1);
        let id = m.active().unwrap().id;
        assert_eq!(m.active().unwrap().state, SessionState::Starting);
        m.mark_running(id, 42);
        assert_eq!(m.active().unwrap().state, SessionState::Running);
        assert_eq!(m.active().unwrap().pid, Some(42));
    }

    #[test]
    fn test_select_bounds() {
        let mut m = manager(3);
        assert_eq!(m.select(2), Some(2));
        assert_eq!(m.select(5), None);
        assert_eq!(m.active_index(), 2);
        assert_eq!(m.select(0), Some(0));
        assert_eq!(m.select(-1), Some(2));
    }

    #[test]
    fn test_next_prev_clamp() {
        let mut m = manager(2);
        assert_eq!(m.prev(), None);
        assert_eq!(m.next(), Some(1));
        assert_eq!(m.next(), None);
        assert_eq!(m.prev(), Some(0));
    }

    #[test]
    fn test_close_sole_session_refused() {
        let mut m = manager(1);
        assert_eq!(m.close_active(), CloseOutcome::Sole);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_close_activates_previous() {
        let mut m = manager(3);
        m.select(2);
        let closed_id = m.active().unwrap().id;
        assert_eq!(m.close_active(), CloseOutcome::Closed { active: 1 });
        assert_eq!(m.len(), 2);
        assert!(m.get(closed_id).is_none());

        // exit notification for the closed child is consumed once
        assert!(m.take_pending_close(closed_id));
        assert!(!m.take_pending_close(closed_id));
    }

    #[test]
    fn test_close_first_activates_following() {
        let mut m = manager(3);
        let second = m.iter().nth(1).unwrap().id;
        assert_eq!(m.close_active(), CloseOutcome::Closed { active: 0 });
        assert_eq!(m.active().unwrap().id, second);
    }

    #[test]
    fn test_remove_before_active_shifts_index() {
        let mut m = manager(3);
        m.select(2);
        let first = m.iter().next().unwrap().id;
        let active_id = m.active().unwrap().id;
        assert_eq!(m.remove(first), Some(1));
        assert_eq!(m.active().unwrap().id, active_id);
    }

    #[test]
    fn test_tab_strip() {
        let mut m = manager(1);
        assert!(m.tab_strip().is_none());
        let id = m.allocate_id();
        m.push(id, Dummy::default());
        m.select(1);
        let strip = m.tab_strip().unwrap();
        assert_eq!(strip.plain(), " 1 [2]~");
    }
}
