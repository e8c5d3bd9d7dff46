//! QR code display.

use qrcode::QrCode;

/// Print `data` as a QR code on stderr, keeping stdout clean for `--json`.
///
/// Half-block characters pack two module rows into each terminal line.
pub fn print_qr_code(data: &str) {
    let code = match QrCode::new(data.as_bytes()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to generate QR code: {}", e);
            return;
        }
    };

    let colors = code.to_colors();
    let width = code.width();
    let dark = |index: usize| colors.get(index).is_some_and(|c| *c == qrcode::Color::Dark);

    let quiet = "  ";
    eprintln!("{}{}", quiet, " ".repeat(width + 4));

    for y in (0..colors.len()).step_by(width * 2) {
        let mut line = format!("{}  ", quiet);
        for x in 0..width {
            line.push(match (dark(y + x), dark(y + width + x)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        eprintln!("{}  ", line);
    }

    eprintln!("{}{}", quiet, " ".repeat(width + 4));
}
