// SPDX-License-Identifier: GPL-3.0-only

/// Identifies an action related to Pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationAction {
    Next,
    Back,
}

/// Position in the upstream Pokémon list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: i64,
    pub limit: i64,
    /// Whether the last fetched page said there is more after it
    pub has_more: bool,
}

impl PageCursor {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            has_more: true,
        }
    }

    /// Moves the cursor, returns false when there is nowhere to go
    pub fn advance(&mut self, action: PaginationAction) -> bool {
        match action {
            PaginationAction::Next => {
                if !self.has_more {
                    return false;
                }
                self.offset += self.limit;
                true
            }
            PaginationAction::Back => {
                if self.offset == 0 {
                    return false;
                }
                self.offset = (self.offset - self.limit).max(0);
                self.has_more = true;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_moves_by_one_page() {
        let mut cursor = PageCursor::new(0, 30);
        assert!(cursor.advance(PaginationAction::Next));
        assert_eq!(cursor.offset, 30);
    }

    #[test]
    fn next_stops_at_the_end() {
        let mut cursor = PageCursor::new(1290, 30);
        cursor.has_more = false;
        assert!(!cursor.advance(PaginationAction::Next));
        assert_eq!(cursor.offset, 1290);
    }

    #[test]
    fn back_never_goes_negative() {
        let mut cursor = PageCursor::new(10, 30);
        assert!(cursor.advance(PaginationAction::Back));
        assert_eq!(cursor.offset, 0);
        assert!(!cursor.advance(PaginationAction::Back));
    }
}
