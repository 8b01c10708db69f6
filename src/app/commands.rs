use crate::data::settings::{AudioSettingsPatch, ColorSchemePatch, FftSize, UnsupportedFftSize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const USAGE: &str = "\
usage: round-sound [command]

commands:
  show                         print settings, swatches and a ray preview (default)
  css [name]                   print the :root style variables, or one of them
  primary <hex>                derive a new scheme from one color
  color <field> <value>        set primary|glow|secondary|accent directly
  audio <key=value>...         fft=<1024|2048|4096|8192> min=<hz> max=<hz>
  wnp <key=value>...           set integration settings (JSON values)
  reset                        restore default settings
  levels [frames]              print band levels from the configured source
  player                       read a player JSON object from stdin and summarize it";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Css(Option<String>),
    Primary(String),
    Color(ColorSchemePatch),
    Audio(AudioSettingsPatch),
    Wnp(Map<String, Value>),
    Reset,
    Levels(Option<u32>),
    Player,
    Help,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command {0:?}")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("unexpected argument {0:?}")]
    Unexpected(String),
    #[error("expected key=value, got {0:?}")]
    NotAPair(String),
    #[error("unknown {section} key {key:?}")]
    UnknownKey { section: &'static str, key: String },
    #[error("invalid number {0:?}")]
    BadNumber(String),
    #[error(transparent)]
    FftSize(#[from] UnsupportedFftSize),
}

pub fn parse<I, S>(args: I) -> Result<Command, CommandError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let Some(cmd) = args.next() else {
        return Ok(Command::Show);
    };
    let rest: Vec<String> = args.collect();

    match cmd.as_str() {
        "show" => no_args(Command::Show, rest),
        "css" => match rest.as_slice() {
            [] => Ok(Command::Css(None)),
            [name] => Ok(Command::Css(Some(name.clone()))),
            [_, extra, ..] => Err(CommandError::Unexpected(extra.clone())),
        },
        "reset" => no_args(Command::Reset, rest),
        "player" => no_args(Command::Player, rest),
        "help" | "-h" | "--help" => Ok(Command::Help),
        "primary" => {
            let [hex] = exactly::<1>(rest, "primary")?;
            Ok(Command::Primary(hex))
        }
        "color" => {
            let [field, value] = exactly::<2>(rest, "color")?;
            parse_color(&field, value).map(Command::Color)
        }
        "audio" => parse_audio(&rest).map(Command::Audio),
        "wnp" => parse_wnp(&rest).map(Command::Wnp),
        "levels" => match rest.as_slice() {
            [] => Ok(Command::Levels(None)),
            [n] => n.parse().map(|n| Command::Levels(Some(n))).map_err(|_| CommandError::BadNumber(n.clone())),
            [_, extra, ..] => Err(CommandError::Unexpected(extra.clone())),
        },
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn no_args(cmd: Command, rest: Vec<String>) -> Result<Command, CommandError> {
    match rest.into_iter().next() {
        None => Ok(cmd),
        Some(extra) => Err(CommandError::Unexpected(extra)),
    }
}

fn exactly<const N: usize>(rest: Vec<String>, name: &'static str) -> Result<[String; N], CommandError> {
    if rest.len() > N {
        return Err(CommandError::Unexpected(rest[N].clone()));
    }
    rest.try_into().map_err(|_| CommandError::MissingArgument(name))
}

fn parse_color(field: &str, value: String) -> Result<ColorSchemePatch, CommandError> {
    let mut patch = ColorSchemePatch::default();
    match field {
        "primary" => patch.primary = Some(value),
        "glow" | "primary-glow" => patch.primary_glow = Some(value),
        "secondary" => patch.secondary = Some(value),
        "accent" => patch.accent = Some(value),
        other => {
            return Err(CommandError::UnknownKey { section: "color", key: other.to_string() });
        }
    }
    Ok(patch)
}

fn split_pair(arg: &str) -> Result<(&str, &str), CommandError> {
    match arg.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k, v)),
        _ => Err(CommandError::NotAPair(arg.to_string())),
    }
}

fn parse_audio(rest: &[String]) -> Result<AudioSettingsPatch, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument("audio"));
    }
    let mut patch = AudioSettingsPatch::default();
    for arg in rest {
        let (key, value) = split_pair(arg)?;
        match key {
            "fft" | "fftSize" => {
                let n: u32 = value.parse().map_err(|_| CommandError::BadNumber(value.to_string()))?;
                patch.fft_size = Some(FftSize::try_from(n)?);
            }
            "min" | "freqMin" => patch.freq_min = Some(parse_hz(value)?),
            "max" | "freqMax" => patch.freq_max = Some(parse_hz(value)?),
            other => {
                return Err(CommandError::UnknownKey { section: "audio", key: other.to_string() });
            }
        }
    }
    Ok(patch)
}

fn parse_hz(value: &str) -> Result<f64, CommandError> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CommandError::BadNumber(value.to_string())),
    }
}

/// Values are read as JSON when they parse, otherwise kept as plain strings.
fn parse_wnp(rest: &[String]) -> Result<Map<String, Value>, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument("wnp"));
    }
    let mut patch = Map::new();
    for arg in rest {
        let (key, value) = split_pair(arg)?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        patch.insert(key.to_string(), value);
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_show() {
        assert_eq!(parse(Vec::<String>::new()), Ok(Command::Show));
    }

    #[test]
    fn test_primary() {
        assert_eq!(parse(["primary", "#00ff00"]), Ok(Command::Primary("#00ff00".to_string())));
        assert_eq!(parse(["primary"]), Err(CommandError::MissingArgument("primary")));
        assert_eq!(parse(["primary", "a", "b"]), Err(CommandError::Unexpected("b".to_string())));
    }

    #[test]
    fn test_color() {
        let Ok(Command::Color(patch)) = parse(["color", "glow", "rgba(0, 0, 0, 0.5)"]) else {
            panic!("expected color command");
        };
        assert_eq!(patch.primary_glow.as_deref(), Some("rgba(0, 0, 0, 0.5)"));
        assert_eq!(patch.primary, None);
        assert!(matches!(parse(["color", "shadow", "#000000"]), Err(CommandError::UnknownKey { .. })));
    }

    #[test]
    fn test_audio() {
        let Ok(Command::Audio(patch)) = parse(["audio", "fft=4096", "min=30"]) else {
            panic!("expected audio command");
        };
        assert_eq!(patch.fft_size, Some(FftSize::N4096));
        assert_eq!(patch.freq_min, Some(30.0));
        assert_eq!(patch.freq_max, None);

        assert_eq!(parse(["audio", "fft=1000"]), Err(CommandError::FftSize(UnsupportedFftSize(1000))));
        assert_eq!(parse(["audio", "min=abc"]), Err(CommandError::BadNumber("abc".to_string())));
        assert_eq!(parse(["audio", "min"]), Err(CommandError::NotAPair("min".to_string())));
        assert_eq!(parse(["audio"]), Err(CommandError::MissingArgument("audio")));
    }

    #[test]
    fn test_wnp_values() {
        let Ok(Command::Wnp(patch)) = parse(["wnp", "port=9000", "name=desk", "enabled=true"]) else {
            panic!("expected wnp command");
        };
        assert_eq!(patch.get("port"), Some(&Value::from(9000)));
        assert_eq!(patch.get("name"), Some(&Value::from("desk")));
        assert_eq!(patch.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_levels() {
        assert_eq!(parse(["css"]), Ok(Command::Css(None)));
        assert_eq!(parse(["css", "--color-accent"]), Ok(Command::Css(Some("--color-accent".to_string()))));
        assert_eq!(parse(["css", "a", "b"]), Err(CommandError::Unexpected("b".to_string())));
        assert_eq!(parse(["levels"]), Ok(Command::Levels(None)));
        assert_eq!(parse(["levels", "5"]), Ok(Command::Levels(Some(5))));
        assert_eq!(parse(["levels", "x"]), Err(CommandError::BadNumber("x".to_string())));
    }

    #[test]
    fn test_unknown_and_extra() {
        assert_eq!(parse(["dance"]), Err(CommandError::Unknown("dance".to_string())));
        assert_eq!(parse(["reset", "now"]), Err(CommandError::Unexpected("now".to_string())));
    }
}
