//! Colour string parsing.
//!
//! Accepted notations:
//! - hex with or without `#`: `rgb`, `rgba`, `rrggbb`, `rrggbbaa` (alpha is
//!   read but discarded);
//! - `rgb()` / `rgba()` with comma or space separated channels, each either a
//!   number in `0..=255` or a percentage;
//! - `hsl()` / `hsla()` with a hue in degrees and percentage saturation and
//!   lightness;
//! - CSS named colours such as `tomato` or `navy`.

use crate::colour::Colour;
use crate::error::ColourError;

pub(crate) fn parse_colour(input: &str) -> Result<Colour, ColourError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColourError::Empty);
    }
    let lowered = trimmed.to_ascii_lowercase();

    if let Some(hex) = lowered.strip_prefix('#') {
        return parse_hex(hex, trimmed);
    }
    if let Some(args) = function_args(&lowered, &["rgba", "rgb"]) {
        return parse_rgb_function(args, trimmed);
    }
    if let Some(args) = function_args(&lowered, &["hsla", "hsl"]) {
        return parse_hsl_function(args, trimmed);
    }
    if let Some(named) = palette::named::from_str(&lowered) {
        return Ok(Colour::from_rgb8(named.red, named.green, named.blue));
    }
    if lowered.chars().all(|c| c.is_ascii_hexdigit()) {
        return parse_hex(&lowered, trimmed);
    }

    Err(ColourError::Unrecognised {
        input: trimmed.to_owned(),
    })
}

fn parse_hex(digits: &str, original: &str) -> Result<Colour, ColourError> {
    let invalid = || ColourError::InvalidHex {
        input: original.to_owned(),
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_owned(),
        _ => return Err(invalid()),
    };

    let channel = |offset: usize| {
        expanded
            .get(offset..offset + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(invalid)
    };
    Ok(Colour::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}

fn function_args<'a>(input: &'a str, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| {
        input
            .strip_prefix(name)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
    })
}

fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '/'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_rgb_function(args: &str, original: &str) -> Result<Colour, ColourError> {
    let invalid = |message: String| ColourError::InvalidFunction {
        notation: "rgb",
        input: original.to_owned(),
        message,
    };
    let parts = split_args(args);
    if !(3..=4).contains(&parts.len()) {
        return Err(invalid(format!(
            "expected 3 channels, found {}",
            parts.len()
        )));
    }

    let mut channels = [0.0_f64; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        *slot = part
            .strip_suffix('%')
            .map_or_else(
                || parse_number(part).map(|value| value / 255.0),
                |percent| parse_number(percent).map(|value| value / 100.0),
            )
            .ok_or_else(|| invalid(format!("'{part}' is not a number")))?;
    }
    let [red, green, blue] = channels;
    Ok(Colour::from_rgb(red, green, blue))
}

fn parse_hsl_function(args: &str, original: &str) -> Result<Colour, ColourError> {
    let invalid = |message: String| ColourError::InvalidFunction {
        notation: "hsl",
        input: original.to_owned(),
        message,
    };
    let parts = split_args(args);
    let (Some(hue), Some(saturation), Some(lightness)) =
        (parts.first(), parts.get(1), parts.get(2))
    else {
        return Err(invalid(format!(
            "expected 3 components, found {}",
            parts.len()
        )));
    };

    let hue_degrees = parse_number(hue.trim_end_matches("deg"))
        .ok_or_else(|| invalid(format!("'{hue}' is not a hue")))?;
    let percentage = |part: &str| {
        part.strip_suffix('%')
            .and_then(parse_number)
            .map(|value| value / 100.0)
            .ok_or_else(|| invalid(format!("'{part}' is not a percentage")))
    };
    Ok(Colour::from_hsl(
        hue_degrees,
        percentage(*saturation)?,
        percentage(*lightness)?,
    ))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
