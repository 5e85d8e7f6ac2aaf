use crate::error::CommandError;
use crate::types::ExchangeQuery;

pub const EXCHANGE_COMMAND: &str = "exchange";

/// What an inbound text frame asks the relay to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    Chat(&'a str),
    Exchange(ExchangeQuery),
}

/// Classify a text message.
///
/// `exchange` and `exchange <N>` are commands; any other text starting with
/// `exchange` is a format error; everything else is chat.
pub fn parse_message(text: &str) -> Result<Inbound<'_>, CommandError> {
    if !text.starts_with(EXCHANGE_COMMAND) {
        return Ok(Inbound::Chat(text));
    }

    let parts: Vec<&str> = text.split_whitespace().collect();
    let days = match parts.as_slice() {
        [cmd] if *cmd == EXCHANGE_COMMAND => 1,
        [cmd, n] if *cmd == EXCHANGE_COMMAND && is_digits(n) => {
            // Too many digits for u64 is still just out of range
            n.parse::<u64>().unwrap_or(u64::MAX)
        }
        _ => return Err(CommandError::Format),
    };

    ExchangeQuery::with_default_currencies(days).map(Inbound::Exchange)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days_of(text: &str) -> u64 {
        match parse_message(text) {
            Ok(Inbound::Exchange(query)) => query.days(),
            other => panic!("expected exchange command, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_exchange_is_one_day() {
        assert_eq!(days_of("exchange"), 1);
        assert_eq!(parse_message("exchange"), parse_message("exchange 1"));
    }

    #[test]
    fn test_exchange_with_days() {
        assert_eq!(days_of("exchange 3"), 3);
        assert_eq!(days_of("exchange 10"), 10);
        assert_eq!(days_of("exchange   7  "), 7);
        assert_eq!(days_of("exchange 05"), 5);
    }

    #[test]
    fn test_exchange_uses_fixed_currencies() {
        match parse_message("exchange 2").unwrap() {
            Inbound::Exchange(query) => {
                assert_eq!(query.currencies(), &["USD".to_string(), "EUR".to_string()])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(parse_message("exchange 0"), Err(CommandError::Range(0)));
        assert_eq!(parse_message("exchange 11"), Err(CommandError::Range(11)));
        assert_eq!(
            parse_message("exchange 99999999999999999999999"),
            Err(CommandError::Range(u64::MAX))
        );
    }

    #[test]
    fn test_bad_format() {
        for text in [
            "exchange abc",
            "exchange -1",
            "exchange 1 2",
            "exchange 2.5",
            "exchanges",
            "exchange3",
        ] {
            assert_eq!(parse_message(text), Err(CommandError::Format), "{}", text);
        }
    }

    #[test]
    fn test_chat() {
        assert_eq!(parse_message("hello"), Ok(Inbound::Chat("hello")));
        assert_eq!(
            parse_message(" exchange 3"),
            Ok(Inbound::Chat(" exchange 3"))
        );
        assert_eq!(parse_message("Exchange"), Ok(Inbound::Chat("Exchange")));
        assert_eq!(parse_message(""), Ok(Inbound::Chat("")));
    }
}
