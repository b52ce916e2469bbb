use anyhow::Error as Anyhow;
use lib::chess::{Color, File, Piece, Rank, Role, Square};
use lib::play::Play;
use lib::render::{Frame, Rgb, Theme};
use lib::rules::Rules;
use lib::session::Session;
use std::error::Error;
use std::io::{stdout, Write};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};

/// The size of a tile in pixels.
const TILE: u32 = 64;

/// Maps a click to a [`Square`].
///
/// Accepts either a square in algebraic notation, e.g. `e2`, or pixel
/// coordinates `x y` measured from the top-left corner of the board. Clicks
/// outside the board map to nothing.
fn click(input: &str) -> Option<Square> {
    let input = input.trim();

    if let Ok(s) = input.parse() {
        return Some(s);
    }

    let mut parts = input.split_whitespace();
    let x: u32 = parts.next()?.parse().ok()?;
    let y: u32 = parts.next()?.parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    let (file, rank) = (x / TILE, 7u32.checked_sub(y / TILE)?);

    if file > 7 {
        return None;
    }

    Some(Square::new(
        File::from_index(file as u8),
        Rank::from_index(rank as u8),
    ))
}

fn glyph(p: Piece) -> char {
    match (p.color, p.role) {
        (Color::White, Role::Pawn) => '♙',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::King) => '♔',
        (Color::Black, Role::Pawn) => '♟',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::King) => '♚',
    }
}

fn draw<W, R, E>(w: &mut W, session: &Session<R, E>, theme: &Theme) -> std::io::Result<()>
where
    W: Write,
    R: Rules,
    E: Play,
{
    let frame = Frame::new(
        session.position(),
        session.selection(),
        session.last_move(),
        theme,
    );

    for rank in Rank::iter().rev() {
        write!(w, "{} ", rank)?;

        for file in File::iter() {
            let tile = frame.tile(Square::new(file, rank));
            let Rgb(r, g, b) = tile.background;
            write!(w, "\x1b[48;2;{};{};{}m", r, g, b)?;

            match (tile.piece, tile.marker) {
                (Some(p), _) => write!(w, "{} ", glyph(p))?,
                (None, true) => write!(w, "· ")?,
                (None, false) => write!(w, "  ")?,
            }
        }

        writeln!(w, "\x1b[0m")?;
    }

    writeln!(w, "  a b c d e f g h")?;
    Ok(())
}

/// Drives a session until the game ends or the input is exhausted.
#[instrument(level = "trace", skip(session), err)]
pub async fn run<R, E>(mut session: Session<R, E>) -> Result<(), Anyhow>
where
    R: Rules,
    E: Play,
    E::Error: Error + Send + Sync + 'static,
{
    let theme = Theme::default();
    let mut lines = BufReader::new(stdin()).lines();

    loop {
        let mut out = stdout();
        draw(&mut out, &session, &theme)?;

        match session.outcome() {
            Some(o) => {
                writeln!(out, "{}", o)?;
                out.flush()?;
                info!("{}", o);
                break;
            }

            None => {
                writeln!(out, "{} to move", session.position().turn())?;
                out.flush()?;
            }
        }

        if session.is_pending() {
            session.engine_turn().await?;
            continue;
        }

        match lines.next_line().await? {
            None => break,

            Some(l) if l.trim() == "quit" => break,

            Some(l) => match click(&l) {
                Some(s) => session.click(s),
                None => warn!("ignoring `{}`", l.trim()),
            },
        }
    }

    session.close();
    Ok(())
}
