use rowcast_core::types::{InstanceId, InstanceIdError};

///
/// Generator
///
/// Monotonic instance-id generation. It has to keep state to make sure
/// identity order matches insertion order; each id is the increment of the
/// previous one, so generation is deterministic and needs no randomness.
///

pub struct Generator {
    previous: InstanceId,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous: InstanceId::nil(),
        }
    }

    // generate
    /// Next identity in the monotonic sequence.
    pub fn generate(&mut self) -> Result<InstanceId, InstanceIdError> {
        match self.previous.increment() {
            Some(next) => {
                self.previous = next;

                Ok(next)
            }
            None => Err(InstanceIdError::GeneratorOverflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_monotonic() {
        let mut g = Generator::new();
        let a = g.generate().unwrap();
        let b = g.generate().unwrap();

        assert!(a < b);
        assert!(!a.is_nil());
    }
}
