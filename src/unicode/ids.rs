use crate::CodePoint;

pub fn is_id_start(cp: CodePoint) -> bool {
    if cp < 0x41 {
        return false;
    }
    if cp < 0x5b {
        return true;
    }
    if cp < 0x61 {
        return false;
    }
    if cp < 0x7b {
        return true;
    }
    is_large_id_start(cp)
}

/// Approximates Unicode `ID_Start` for non-ASCII code points. The exact
/// table is a versioned external input (see DESIGN.md); `char::is_alphabetic`
/// agrees with `ID_Start` for the scripts patterns are realistically written
/// against.
fn is_large_id_start(cp: CodePoint) -> bool {
    char::from_u32(cp).is_some_and(|c| c.is_alphabetic())
}

pub fn is_id_continue(cp: CodePoint) -> bool {
    if cp < 0x30 {
        return false;
    }
    if cp < 0x3a {
        return true;
    }
    if cp == 0x5f {
        return true;
    }
    if is_id_start(cp) {
        return true;
    }
    is_large_id_continue(cp)
}

fn is_large_id_continue(cp: CodePoint) -> bool {
    char::from_u32(cp).is_some_and(|c| c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}')
}
