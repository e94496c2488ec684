use serde::{Deserialize, Serialize};

/// Side of the board a piece (or player) belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction a pawn of this color advances in.
    pub fn pawn_direction(self) -> i16 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row pawns of this color start on.
    pub fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// A piece on the board. Immutable once placed; captures replace the
/// destination square wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color) -> Piece {
        Piece { kind, color }
    }
}

/// A square address. Valid squares have row and col in 0..8; inbound
/// positions are bounds-checked before any board access.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row < 8 && self.col < 8
    }
}

/// Back rank layout in file order, shared by both colors.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8x8 grid of optional pieces, addressed by (row, col). Serializes as a
/// nested array so clients receive the board in full on every update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board([[Option<Piece>; 8]; 8]);

impl Board {
    /// The fixed starting layout: black on rows 0-1, white on rows 6-7.
    pub fn initial() -> Board {
        let mut squares = [[None; 8]; 8];
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            squares[0][col] = Some(Piece::new(kind, Color::Black));
            squares[7][col] = Some(Piece::new(kind, Color::White));
        }
        for col in 0..8 {
            squares[1][col] = Some(Piece::new(PieceType::Pawn, Color::Black));
            squares[6][col] = Some(Piece::new(PieceType::Pawn, Color::White));
        }
        Board(squares)
    }

    /// A board with no pieces on it.
    pub fn empty() -> Board {
        Board([[None; 8]; 8])
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.0[pos.row as usize][pos.col as usize]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        self.0[pos.row as usize][pos.col as usize] = piece;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_matches_starting_position() {
        let board = Board::initial();
        for col in 0..8u8 {
            let kind = BACK_RANK[col as usize];
            assert_eq!(
                board.get(Position::new(0, col)),
                Some(Piece::new(kind, Color::Black))
            );
            assert_eq!(
                board.get(Position::new(1, col)),
                Some(Piece::new(PieceType::Pawn, Color::Black))
            );
            assert_eq!(
                board.get(Position::new(6, col)),
                Some(Piece::new(PieceType::Pawn, Color::White))
            );
            assert_eq!(
                board.get(Position::new(7, col)),
                Some(Piece::new(kind, Color::White))
            );
        }
    }

    #[test]
    fn initial_middle_rows_are_empty() {
        let board = Board::initial();
        for row in 2..6u8 {
            for col in 0..8u8 {
                assert_eq!(board.get(Position::new(row, col)), None);
            }
        }
    }

    #[test]
    fn queen_and_king_files_match_for_both_colors() {
        let board = Board::initial();
        for &(row, color) in &[(0u8, Color::Black), (7u8, Color::White)] {
            assert_eq!(
                board.get(Position::new(row, 3)),
                Some(Piece::new(PieceType::Queen, color))
            );
            assert_eq!(
                board.get(Position::new(row, 4)),
                Some(Piece::new(PieceType::King, color))
            );
        }
    }

    #[test]
    fn piece_serializes_with_lowercase_tags() {
        let piece = Piece::new(PieceType::Knight, Color::Black);
        let json = serde_json::to_string(&piece).unwrap();
        assert_eq!(json, r#"{"type":"knight","color":"black"}"#);
    }

    #[test]
    fn set_and_get_round_trip_through_the_grid() {
        let mut board = Board::empty();
        let pos = Position::new(4, 4);
        board.set(pos, Some(Piece::new(PieceType::Rook, Color::White)));
        assert_eq!(
            board.get(pos),
            Some(Piece::new(PieceType::Rook, Color::White))
        );
        board.set(pos, None);
        assert_eq!(board.get(pos), None);
    }

    #[test]
    fn position_bounds() {
        assert!(Position::new(0, 0).in_bounds());
        assert!(Position::new(7, 7).in_bounds());
        assert!(!Position::new(8, 0).in_bounds());
        assert!(!Position::new(0, 8).in_bounds());
    }
}
