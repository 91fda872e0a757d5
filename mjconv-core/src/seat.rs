//! Seat arithmetic between the observer-relative wire view and absolute
//! table seats.
//!
//! The wire numbers every seat relative to the observer (0 = observer,
//! 1 = next in turn order). The normalized stream uses absolute seats.

/// The observer's absolute seat and the number of players at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    observer: u8,
    players: u8,
}

impl Seating {
    pub fn new(observer: u8, players: u8) -> Self {
        let players = players.clamp(1, 4);
        Seating {
            observer: observer % players,
            players,
        }
    }

    /// Four-player table seen from `observer`.
    pub fn four_player(observer: u8) -> Self {
        Self::new(observer, 4)
    }

    #[inline]
    pub fn observer(self) -> u8 {
        self.observer
    }

    #[inline]
    pub fn players(self) -> u8 {
        self.players
    }

    #[inline]
    pub fn is_observer(self, absolute: u8) -> bool {
        absolute == self.observer
    }

    #[inline]
    pub fn to_absolute(self, relative: u8) -> u8 {
        (self.observer + relative % self.players) % self.players
    }

    #[inline]
    pub fn to_relative(self, absolute: u8) -> u8 {
        (absolute % self.players + self.players - self.observer) % self.players
    }

    /// The seat that plays immediately before `absolute`.
    #[inline]
    pub fn previous(self, absolute: u8) -> u8 {
        (absolute + self.players - 1) % self.players
    }

    /// `absolute` moved forward `steps` seats in turn order.
    #[inline]
    pub fn offset(self, absolute: u8, steps: u8) -> u8 {
        (absolute + steps % self.players) % self.players
    }

    /// Reorders per-seat values given in relative order into absolute order.
    /// Entries past the player count (the empty fourth slot of a
    /// three-player table) are dropped.
    pub fn rotate<T: Clone>(self, relative: &[T]) -> Vec<T> {
        let n = relative.len().min(usize::from(self.players));
        (0..n)
            .map(|absolute| {
                let rel = (absolute + n - usize::from(self.observer) % n) % n;
                relative[rel].clone()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_absolute_round_trip() {
        for players in [3u8, 4] {
            for observer in 0..players {
                let s = Seating::new(observer, players);
                for rel in 0..players {
                    assert_eq!(s.to_relative(s.to_absolute(rel)), rel);
                }
                assert_eq!(s.to_absolute(0), observer);
            }
        }
    }

    #[test]
    fn previous_and_offset_wrap() {
        let s = Seating::four_player(2);
        assert_eq!(s.previous(0), 3);
        assert_eq!(s.offset(3, 2), 1);
        let sanma = Seating::new(0, 3);
        assert_eq!(sanma.previous(0), 2);
        assert_eq!(sanma.offset(2, 1), 0);
    }

    #[test]
    fn rotate_puts_observer_value_at_its_seat() {
        let s = Seating::four_player(1);
        // relative order: observer, shimocha, toimen, kamicha
        assert_eq!(s.rotate(&[10, 20, 30, 40]), vec![40, 10, 20, 30]);
        let sanma = Seating::new(2, 3);
        assert_eq!(sanma.rotate(&[10, 20, 30, 0]), vec![20, 30, 10]);
    }
}
