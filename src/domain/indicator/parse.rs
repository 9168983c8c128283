//! Indicator expression parser.
//!
//! Grammar:
//!
//! ```text
//! list      := indicator (',' indicator)*
//! indicator := NONE | TIMELINE
//!            | MA '(' int ')' | EMA '(' int ')'
//!            | KDJ '(' int [',' int ',' int] ')'
//!            | MACD '(' int ',' int ',' int ')'
//!            | BOLL '(' int [',' number] ')'
//! ```
//!
//! The BOLL multiplier takes at most two decimal places. Names are
//! case-sensitive upper case. Positions in errors are byte offsets
//! into the whole input.

use crate::domain::error::ParseError;
use crate::domain::indicator::{bollinger, kdj, Indicator};
use std::str::FromStr;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.peek().is_none()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError {
                message: format!("expected '{}', found '{}'", expected, ch),
                position: self.pos,
            }),
            None => Err(ParseError {
                message: format!("expected '{}', found end of input", expected),
                position: self.pos,
            }),
        }
    }

    fn peek_word(&self) -> String {
        let mut word = String::new();
        for ch in self.remaining().chars() {
            if ch.is_alphanumeric() || ch == '_' {
                word.push(ch);
            } else {
                break;
            }
        }
        if word.is_empty() {
            self.peek()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "end of input".to_string())
        } else {
            word
        }
    }

    fn parse_integer(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.advance();
        }

        if self.pos == start {
            return Err(ParseError {
                message: format!("expected integer, found '{}'", self.peek_word()),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<usize>().map_err(|_| ParseError {
            message: format!("invalid integer: {}", num_str),
            position: start,
        })
    }

    fn parse_number(&mut self) -> Result<f64, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut has_dot = false;
        let mut digits = 0;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits += 1;
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        if digits == 0 {
            return Err(ParseError {
                message: format!("expected number, found '{}'", self.peek_word()),
                position: start,
            });
        }

        let num_str = &self.input[start..self.pos];
        num_str.parse::<f64>().map_err(|_| ParseError {
            message: format!("invalid number: {}", num_str),
            position: start,
        })
    }

    /// Bollinger multiplier in hundredths. At most two decimal places, so the
    /// stored value is exact.
    fn parse_multiplier_x100(&mut self) -> Result<u32, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let mult = self.parse_number()?;
        let text = &self.input[start..self.pos];

        let decimals = text.split_once('.').map_or(0, |(_, frac)| frac.len());
        if decimals > 2 {
            return Err(ParseError {
                message: format!(
                    "multiplier {} has more than two decimal places",
                    text
                ),
                position: start,
            });
        }

        let scaled = (mult * 100.0).round();
        if !scaled.is_finite() || scaled > f64::from(u32::MAX) {
            return Err(ParseError {
                message: format!("multiplier {} is too large", text),
                position: start,
            });
        }
        if scaled == 0.0 && mult != 0.0 {
            return Err(ParseError {
                message: format!("multiplier {} rounds to zero", text),
                position: start,
            });
        }
        Ok(scaled as u32)
    }

    fn parse_indicator(&mut self) -> Result<Indicator, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let word = self.peek_word();

        let indicator = match word.as_str() {
            "NONE" => {
                self.pos += word.len();
                Indicator::None
            }
            "TIMELINE" => {
                self.pos += word.len();
                Indicator::Timeline
            }
            "MA" | "EMA" => {
                self.pos += word.len();
                self.expect_char('(')?;
                let window = self.parse_integer()?;
                self.expect_char(')')?;
                if word == "MA" {
                    Indicator::Ma(window)
                } else {
                    Indicator::Ema(window)
                }
            }
            "KDJ" => {
                self.pos += word.len();
                if !self.consume_char('(') {
                    return Ok(Indicator::kdj_default());
                }
                let period = self.parse_integer()?;
                let (k_smooth, d_smooth) = if self.consume_char(',') {
                    let k_smooth = self.parse_integer()?;
                    self.expect_char(',')?;
                    (k_smooth, self.parse_integer()?)
                } else {
                    (kdj::DEFAULT_K_SMOOTH, kdj::DEFAULT_D_SMOOTH)
                };
                self.expect_char(')')?;
                Indicator::Kdj {
                    period,
                    k_smooth,
                    d_smooth,
                }
            }
            "MACD" => {
                self.pos += word.len();
                if !self.consume_char('(') {
                    return Ok(Indicator::macd_default());
                }
                let fast = self.parse_integer()?;
                self.expect_char(',')?;
                let slow = self.parse_integer()?;
                self.expect_char(',')?;
                let signal = self.parse_integer()?;
                self.expect_char(')')?;
                Indicator::Macd { fast, slow, signal }
            }
            "BOLL" => {
                self.pos += word.len();
                if !self.consume_char('(') {
                    return Ok(Indicator::boll_default());
                }
                let period = self.parse_integer()?;
                let mult_x100 = if self.consume_char(',') {
                    self.parse_multiplier_x100()?
                } else {
                    bollinger::DEFAULT_MULT_X100
                };
                self.expect_char(')')?;
                Indicator::Boll { period, mult_x100 }
            }
            _ => {
                return Err(ParseError {
                    message: format!(
                        "expected indicator (NONE, TIMELINE, MA, EMA, KDJ, MACD, BOLL), found '{}'",
                        word
                    ),
                    position: start,
                });
            }
        };
        Ok(indicator)
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError {
                message: format!("unexpected trailing input '{}'", self.peek_word()),
                position: self.pos,
            })
        }
    }
}

/// Parse a single indicator expression such as `MACD(12,26,9)`.
pub fn parse_indicator(input: &str) -> Result<Indicator, ParseError> {
    let mut parser = Parser::new(input);
    let indicator = parser.parse_indicator()?;
    parser.expect_end()?;
    Ok(indicator)
}

/// Parse a comma-separated list, e.g. `MA(5), EMA(12), BOLL(20,2)`.
pub fn parse_indicator_list(input: &str) -> Result<Vec<Indicator>, ParseError> {
    let mut parser = Parser::new(input);
    let mut indicators = vec![parser.parse_indicator()?];
    while parser.consume_char(',') {
        indicators.push(parser.parse_indicator()?);
    }
    parser.expect_end()?;
    Ok(indicators)
}

impl FromStr for Indicator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_indicator(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_variants() {
        assert_eq!(parse_indicator("NONE").unwrap(), Indicator::None);
        assert_eq!(parse_indicator("TIMELINE").unwrap(), Indicator::Timeline);
        assert_eq!(parse_indicator("MA(5)").unwrap(), Indicator::Ma(5));
        assert_eq!(parse_indicator(" EMA( 12 ) ").unwrap(), Indicator::Ema(12));
    }

    #[test]
    fn bare_names_take_defaults() {
        assert_eq!(parse_indicator("KDJ").unwrap(), Indicator::kdj_default());
        assert_eq!(parse_indicator("MACD").unwrap(), Indicator::macd_default());
        assert_eq!(parse_indicator("BOLL").unwrap(), Indicator::boll_default());
        assert_eq!(
            parse_indicator_list("MACD, MA(5)").unwrap(),
            vec![Indicator::macd_default(), Indicator::Ma(5)]
        );
    }

    #[test]
    fn parse_kdj_full_and_short() {
        assert_eq!(
            parse_indicator("KDJ(9,3,3)").unwrap(),
            Indicator::Kdj {
                period: 9,
                k_smooth: 3,
                d_smooth: 3
            }
        );
        assert_eq!(
            parse_indicator("KDJ(14)").unwrap(),
            Indicator::Kdj {
                period: 14,
                k_smooth: kdj::DEFAULT_K_SMOOTH,
                d_smooth: kdj::DEFAULT_D_SMOOTH
            }
        );
    }

    #[test]
    fn parse_macd() {
        assert_eq!(
            parse_indicator("MACD(12, 26, 9)").unwrap(),
            Indicator::Macd {
                fast: 12,
                slow: 26,
                signal: 9
            }
        );
    }

    #[test]
    fn parse_boll_default_and_fractional_multiplier() {
        assert_eq!(
            parse_indicator("BOLL(20)").unwrap(),
            Indicator::Boll {
                period: 20,
                mult_x100: 200
            }
        );
        assert_eq!(
            parse_indicator("BOLL(20,2.5)").unwrap(),
            Indicator::Boll {
                period: 20,
                mult_x100: 250
            }
        );
    }

    #[test]
    fn boll_multiplier_two_decimals_exact() {
        assert_eq!(
            parse_indicator("BOLL(20,0.05)").unwrap(),
            Indicator::Boll {
                period: 20,
                mult_x100: 5
            }
        );
        assert_eq!(
            parse_indicator("BOLL(20,0)").unwrap(),
            Indicator::Boll {
                period: 20,
                mult_x100: 0
            }
        );
    }

    #[test]
    fn boll_multiplier_too_precise_rejected() {
        let err = parse_indicator("BOLL(20,0.004)").unwrap_err();
        assert_eq!(err.position, 8);
        assert!(err.message.contains("decimal places"));

        let err = parse_indicator("BOLL(20,2.125)").unwrap_err();
        assert!(err.message.contains("decimal places"));
    }

    #[test]
    fn boll_multiplier_too_large_rejected() {
        let err = parse_indicator("BOLL(20,99999999999)").unwrap_err();
        assert_eq!(err.position, 8);
        assert!(err.message.contains("too large"));

        let huge = format!("BOLL(20,{})", "9".repeat(400));
        assert!(parse_indicator(&huge).unwrap_err().message.contains("too large"));
    }

    #[test]
    fn boll_multiplier_at_limit_accepted() {
        let err = parse_indicator("BOLL(20,42949672.96)").unwrap_err();
        assert!(err.message.contains("too large"));
        assert_eq!(
            parse_indicator("BOLL(20,42949672.95)").unwrap(),
            Indicator::Boll {
                period: 20,
                mult_x100: u32::MAX
            }
        );
    }

    #[test]
    fn parse_via_from_str() {
        let indicator: Indicator = "EMA(26)".parse().unwrap();
        assert_eq!(indicator, Indicator::Ema(26));
    }

    #[test]
    fn parse_list() {
        let list = parse_indicator_list("MA(5), MACD(12,26,9), BOLL(20,2)").unwrap();
        assert_eq!(
            list,
            vec![
                Indicator::Ma(5),
                Indicator::Macd {
                    fast: 12,
                    slow: 26,
                    signal: 9
                },
                Indicator::Boll {
                    period: 20,
                    mult_x100: 200
                },
            ]
        );
    }

    #[test]
    fn display_round_trips_through_parser() {
        for text in ["MA(5)", "KDJ(9,3,3)", "MACD(12,26,9)", "BOLL(20,2.5)", "TIMELINE"] {
            let indicator = parse_indicator(text).unwrap();
            assert_eq!(indicator.to_string(), text);
        }
    }

    #[test]
    fn error_unknown_indicator() {
        let err = parse_indicator("RSI(14)").unwrap_err();
        assert_eq!(err.position, 0);
        assert!(err.message.contains("RSI"));
    }

    #[test]
    fn error_missing_integer() {
        let err = parse_indicator("MA(x)").unwrap_err();
        assert_eq!(err.position, 3);
        assert!(err.message.contains("expected integer"));
    }

    #[test]
    fn error_negative_window_rejected() {
        let err = parse_indicator("MA(-5)").unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn error_missing_close_paren() {
        let err = parse_indicator("MACD(12,26,9").unwrap_err();
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn error_trailing_input() {
        let err = parse_indicator("MA(5) junk").unwrap_err();
        assert_eq!(err.position, 6);
    }

    #[test]
    fn error_position_in_list() {
        let err = parse_indicator_list("MA(5), EMA()").unwrap_err();
        assert_eq!(err.position, 11);
    }
}
