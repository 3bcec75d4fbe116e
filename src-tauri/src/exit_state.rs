#[derive(Debug, Default)]
pub(crate) struct ExitStateMachine {
    quitting: bool,
    cleanup_started: bool,
}

impl ExitStateMachine {
    pub(crate) fn mark_quitting(&mut self) {
        self.quitting = true;
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Backend cleanup runs once, however many quit events arrive.
    pub(crate) fn try_begin_cleanup(&mut self) -> bool {
        if self.cleanup_started {
            return false;
        }
        self.quitting = true;
        self.cleanup_started = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::ExitStateMachine;

    #[test]
    fn mark_quitting_is_sticky() {
        let mut state = ExitStateMachine::default();
        assert!(!state.is_quitting());

        state.mark_quitting();
        state.mark_quitting();
        assert!(state.is_quitting());
    }

    #[test]
    fn try_begin_cleanup_only_succeeds_once() {
        let mut state = ExitStateMachine::default();

        assert!(state.try_begin_cleanup());
        assert!(state.is_quitting());
        assert!(!state.try_begin_cleanup());
    }
}
