//! Per-piece move legality. Covers base piece movement only: no castling,
//! en passant, promotion, or check detection.

use crate::game::board::{Board, Color, PieceType, Position};

/// Whether moving the piece at `from` to `to` is legal for `turn_color`.
///
/// Both positions must already be in bounds; the session controller gates
/// inbound coordinates before calling in here.
pub fn is_legal_move(board: &Board, from: Position, to: Position, turn_color: Color) -> bool {
    if from == to {
        return false;
    }
    let piece = match board.get(from) {
        Some(p) => p,
        None => return false,
    };
    if piece.color != turn_color {
        return false;
    }
    if let Some(target) = board.get(to) {
        if target.color == turn_color {
            return false;
        }
    }

    match piece.kind {
        PieceType::Pawn => pawn_move_legal(board, from, to, piece.color),
        PieceType::Rook => rook_move_legal(board, from, to),
        PieceType::Knight => knight_move_legal(from, to),
        PieceType::Bishop => bishop_move_legal(board, from, to),
        PieceType::Queen => rook_move_legal(board, from, to) || bishop_move_legal(board, from, to),
        PieceType::King => king_move_legal(from, to),
    }
}

fn pawn_move_legal(board: &Board, from: Position, to: Position, color: Color) -> bool {
    let direction = color.pawn_direction();
    let row_diff = to.row as i16 - from.row as i16;
    let col_diff = (to.col as i16 - from.col as i16).abs();

    // Straight advance: destination must be empty.
    if col_diff == 0 {
        if board.get(to).is_some() {
            return false;
        }
        if row_diff == direction {
            return true;
        }
        // Double step from the start row also needs the passed-over square free.
        if from.row == color.pawn_start_row() && row_diff == 2 * direction {
            let step = Position::new((from.row as i16 + direction) as u8, from.col);
            return board.get(step).is_none();
        }
        return false;
    }

    // Diagonal capture, one square forward.
    if col_diff == 1 && row_diff == direction {
        return match board.get(to) {
            Some(target) => target.color != color,
            None => false,
        };
    }

    false
}

fn rook_move_legal(board: &Board, from: Position, to: Position) -> bool {
    if from.row != to.row && from.col != to.col {
        return false;
    }
    path_clear(board, from, to)
}

fn knight_move_legal(from: Position, to: Position) -> bool {
    let row_diff = (to.row as i16 - from.row as i16).abs();
    let col_diff = (to.col as i16 - from.col as i16).abs();
    (row_diff == 2 && col_diff == 1) || (row_diff == 1 && col_diff == 2)
}

fn bishop_move_legal(board: &Board, from: Position, to: Position) -> bool {
    let row_diff = (to.row as i16 - from.row as i16).abs();
    let col_diff = (to.col as i16 - from.col as i16).abs();
    if row_diff != col_diff {
        return false;
    }
    path_clear(board, from, to)
}

fn king_move_legal(from: Position, to: Position) -> bool {
    let row_diff = (to.row as i16 - from.row as i16).abs();
    let col_diff = (to.col as i16 - from.col as i16).abs();
    row_diff <= 1 && col_diff <= 1
}

/// Walks one square at a time from `from` toward `to` and reports whether
/// every intermediate square (destination excluded) is empty.
fn path_clear(board: &Board, from: Position, to: Position) -> bool {
    let row_step = (to.row as i16 - from.row as i16).signum();
    let col_step = (to.col as i16 - from.col as i16).signum();

    let mut row = from.row as i16 + row_step;
    let mut col = from.col as i16 + col_step;
    while (row, col) != (to.row as i16, to.col as i16) {
        if board.get(Position::new(row as u8, col as u8)).is_some() {
            return false;
        }
        row += row_step;
        col += col_step;
    }
    true
}
