//! Grouping solitary values into score statements.
//!
//! Texts often state the grades of one score in separate fragments
//! ("primary 4 ... secondary 3"). Walking the solitary values left to right,
//! the first template from [`TEMPLATES`] whose elementwise repetition matches
//! the upcoming roles claims them. With `n_each > 1` the window holds
//! `n_each` interleaved statements, so `a a b b` becomes `{a, b}` twice.

use scorematch_core::{Error, ParsedObservation, Result, Role};

const A: Role = Role::Primary;
const B: Role = Role::Secondary;
const T: Role = Role::Tertiary;
const C: Role = Role::Aggregate;

/// Allowed role sequences, most specific first.
pub const TEMPLATES: [&[Role]; 12] = [
    &[C, A, B, T],
    &[C, A, B],
    &[C, B, A],
    &[A, B, T, C],
    &[A, B, C],
    &[B, A, C],
    &[A, B, T],
    &[A, B],
    &[A],
    &[B],
    &[T],
    &[C],
];

/// Default for the largest `n_each` tried.
pub const DEFAULT_MAX_REPEAT: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct ElementCombinationResolver {
    max_repeat: usize,
}

impl Default for ElementCombinationResolver {
    fn default() -> Self {
        Self {
            max_repeat: DEFAULT_MAX_REPEAT,
        }
    }
}

impl ElementCombinationResolver {
    pub fn new(max_repeat: usize) -> Result<Self> {
        if max_repeat == 0 {
            return Err(Error::InvalidSetting {
                name: "max_repeat",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self { max_repeat })
    }

    #[must_use]
    pub const fn max_repeat(&self) -> usize {
        self.max_repeat
    }

    /// One group id per role, in input order. Ids start at 0 and first
    /// appear in increasing order.
    #[must_use]
    pub fn resolve(&self, roles: &[Role]) -> Vec<usize> {
        let mut groups = vec![0; roles.len()];
        let mut next_group = 0;
        let mut i = 0;

        while i < roles.len() {
            let (len, n_each) = self.find_window(&roles[i..]);
            for offset in 0..len {
                groups[i + offset] = next_group + offset % n_each;
            }
            next_group += n_each;
            i += len;
        }

        groups
    }

    /// [`Self::resolve`] over observations that must each carry one role.
    pub fn resolve_observations(&self, observations: &[ParsedObservation]) -> Result<Vec<usize>> {
        let roles = observations
            .iter()
            .enumerate()
            .map(|(index, observation)| {
                observation
                    .values
                    .sole_role()
                    .ok_or(Error::NotSolitary { index })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.resolve(&roles))
    }

    /// Length and repeat count of the first template matching at the start
    /// of `rest`. Smaller repeat counts win.
    fn find_window(&self, rest: &[Role]) -> (usize, usize) {
        for template in TEMPLATES {
            for n_each in 1..=self.max_repeat {
                let len = template.len() * n_each;
                if len > rest.len() {
                    break;
                }
                let matches = rest[..len]
                    .iter()
                    .enumerate()
                    .all(|(offset, role)| template[offset / n_each] == *role);
                if matches {
                    return (len, n_each);
                }
            }
        }
        // Single-role templates match any role.
        (1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(roles: &[Role]) -> Vec<usize> {
        ElementCombinationResolver::default().resolve(roles)
    }

    #[test]
    fn test_simple_group() {
        assert_eq!(resolve(&[A, B, C]), vec![0, 0, 0]);
        assert_eq!(resolve(&[C, B, A]), vec![0, 0, 0]);
    }

    #[test]
    fn test_interleaved_statements() {
        assert_eq!(resolve(&[A, A, B, B, B, C]), vec![0, 1, 0, 1, 2, 3]);
        assert_eq!(resolve(&[A, A, B, B]), vec![0, 1, 0, 1]);
        assert_eq!(resolve(&[A, A, A, B, B, B, C, C, C]), vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_priority_and_smallest_repeat() {
        // [c, a, b] outranks [a, b] starting at the first a.
        assert_eq!(resolve(&[C, A, B, A, B]), vec![0, 0, 0, 1, 1]);
        // [a, b] with n_each = 1 wins over the longer n_each = 2 reading.
        assert_eq!(resolve(&[A, B, A, B]), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_orphans_get_own_groups() {
        assert_eq!(resolve(&[T, T, C]), vec![0, 1, 2]);
        assert_eq!(resolve(&[B, B]), vec![0, 1]);
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn test_window_must_fit() {
        let resolver = ElementCombinationResolver::new(1);
        let Ok(resolver) = resolver else {
            panic!("max_repeat 1 is valid");
        };
        // [a] claims the first a, [a, b] the middle pair, [b] the last.
        assert_eq!(resolver.resolve(&[A, A, B, B]), vec![0, 1, 1, 2]);
        // No template fits [b, t], so each role stands alone.
        assert_eq!(resolver.resolve(&[B, T]), vec![0, 1]);
        assert!(ElementCombinationResolver::new(0).is_err());
    }
}
