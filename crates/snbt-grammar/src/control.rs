//! Cut flags for alternatives

/// Handle to the cut flag of the innermost enclosing alternative.
///
/// Flags live in a pool owned by the [`ParseState`](crate::ParseState); the
/// handle is just an index into it, so terms can pass it around freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Cuts are ignored. Rule bodies start with this.
    Unbound,
    Bound(usize),
}

impl Control {
    pub const fn is_bound(self) -> bool {
        matches!(self, Control::Bound(_))
    }
}

/// Stack of reusable cut flags indexed by alternative nesting depth.
#[derive(Debug, Default)]
pub(crate) struct ControlPool {
    flags: Vec<bool>,
    depth: usize,
}

impl ControlPool {
    pub(crate) fn acquire(&mut self) -> Control {
        let index = self.depth;
        if index == self.flags.len() {
            self.flags.push(false);
        } else {
            self.flags[index] = false;
        }
        self.depth += 1;
        Control::Bound(index)
    }

    pub(crate) fn release(&mut self) {
        debug_assert!(self.depth > 0, "released more controls than acquired");
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn cut(&mut self, control: Control) {
        if let Control::Bound(index) = control {
            if let Some(flag) = self.flags.get_mut(index) {
                *flag = true;
            }
        }
    }

    pub(crate) fn has_cut(&self, control: Control) -> bool {
        match control {
            Control::Unbound => false,
            Control::Bound(index) => self.flags.get(index).copied().unwrap_or(false),
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reacquired_flag_is_reset() {
        let mut pool = ControlPool::default();
        let outer = pool.acquire();
        let inner = pool.acquire();
        pool.cut(inner);
        assert!(pool.has_cut(inner));
        assert!(!pool.has_cut(outer));
        pool.release();

        let again = pool.acquire();
        assert_eq!(again, inner);
        assert!(!pool.has_cut(again));
        pool.release();
        pool.release();
        assert_eq!(pool.depth(), 0);
    }

    #[test]
    fn test_unbound_ignores_cut() {
        let mut pool = ControlPool::default();
        pool.cut(Control::Unbound);
        assert!(!pool.has_cut(Control::Unbound));
    }
}
