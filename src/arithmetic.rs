use core::fmt;

use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Operator {
    #[strum(to_string = "+")]
    Add,
    #[strum(to_string = "-")]
    Subtract,
    #[strum(to_string = "*")]
    Multiply,
    #[strum(to_string = "/")]
    Divide,
}

impl Operator {
    pub fn parse(symbol: &str) -> Result<Operator, CalcError> {
        let symbol = symbol.trim();
        symbol
            .parse()
            .map_err(|_| CalcError::InvalidInput(format!("operador '{}' no reconocido", symbol)))
    }
}

/// A single evaluated operation, kept only long enough to be shown and logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub first: f64,
    pub operator: Operator,
    pub second: f64,
    pub result: f64,
}

impl Calculation {
    pub fn evaluate(first: f64, operator: Operator, second: f64) -> Result<Calculation, CalcError> {
        let result = round_result(compute(first, operator, second)?);
        Ok(Calculation {
            first,
            operator,
            second,
            result,
        })
    }

    /// Log line for this calculation. Batch runs are unnumbered.
    pub fn record(&self, index: Option<u32>) -> String {
        let label = match index {
            Some(index) => format!("**Calculo {}**", index),
            None => String::from("**Calculo**"),
        };
        format!("{} ===>> {}", label, self)
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.first,
            self.operator,
            self.second,
            format_result(self.result)
        )
    }
}

pub fn compute(a: f64, operator: Operator, b: f64) -> Result<f64, CalcError> {
    match operator {
        Operator::Add => Ok(add(a, b)),
        Operator::Subtract => Ok(subtract(a, b)),
        Operator::Multiply => Ok(multiply(a, b)),
        Operator::Divide => divide(a, b),
    }
}

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

pub fn divide(a: f64, b: f64) -> Result<f64, CalcError> {
    // also catches -0.0
    if b == 0.0 {
        return Err(CalcError::Division);
    }
    Ok(a / b)
}

pub fn parse_operand(text: &str) -> Result<f64, CalcError> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CalcError::InvalidInput(format!("'{}' no es un numero", text))),
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round_result(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

pub fn format_result(value: f64) -> String {
    // -0.0 prints as 0.0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::Operator::*;
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn it_adds() {
        assert_eq!(compute(3.0, Add, 4.0).unwrap(), 7.0);
    }

    #[test]
    fn it_subtracts() {
        assert_eq!(compute(3.5, Subtract, 10.0).unwrap(), -6.5);
    }

    #[test]
    fn it_multiplies() {
        assert_eq!(compute(-2.5, Multiply, 4.0).unwrap(), -10.0);
    }

    #[test]
    fn it_divides() {
        assert_eq!(compute(9.0, Divide, 2.0).unwrap(), 4.5);
    }

    #[test]
    fn division_by_zero_fails() {
        assert!(matches!(divide(10.0, 0.0), Err(CalcError::Division)));
        assert!(matches!(divide(0.0, 0.0), Err(CalcError::Division)));
        assert!(matches!(divide(1.0, -0.0), Err(CalcError::Division)));
    }

    #[test]
    fn it_parses_every_operator_from_its_symbol() {
        for operator in Operator::iter() {
            assert_eq!(Operator::parse(&operator.to_string()).unwrap(), operator);
        }
        assert_eq!(Operator::parse(" * ").unwrap(), Multiply);
    }

    #[test]
    fn unknown_operator_is_invalid_input() {
        let err = Operator::parse("%").unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput(_)));
        assert!(err.to_string().contains("'%'"));
    }

    #[test]
    fn it_parses_operands() {
        assert_eq!(parse_operand(" 2.5\n").unwrap(), 2.5);
        assert_eq!(parse_operand("-3").unwrap(), -3.0);
    }

    #[test]
    fn it_rejects_non_numeric_operands() {
        assert!(matches!(parse_operand("abc"), Err(CalcError::InvalidInput(_))));
        assert!(matches!(parse_operand(""), Err(CalcError::InvalidInput(_))));
        assert!(matches!(parse_operand("NaN"), Err(CalcError::InvalidInput(_))));
        assert!(matches!(parse_operand("inf"), Err(CalcError::InvalidInput(_))));
    }

    #[test]
    fn it_rounds_to_two_decimals() {
        assert_eq!(round_result(10.0 / 3.0), 3.33);
        assert_eq!(round_result(2.0 / 3.0), 0.67);
        assert_eq!(round_result(f64::MAX), f64::MAX);
    }

    #[test]
    fn integral_results_keep_one_decimal() {
        assert_eq!(format_result(7.0), "7.0");
        assert_eq!(format_result(-12.0), "-12.0");
        assert_eq!(format_result(3.33), "3.33");
    }

    #[test]
    fn negative_zero_prints_as_zero() {
        assert_eq!(format_result(-0.0), "0.0");
        let calculation = Calculation::evaluate(0.0, Multiply, -1.0).unwrap();
        assert_eq!(calculation.record(Some(0)), "**Calculo 0** ===>> 0 * -1 = 0.0");
        let calculation = Calculation::evaluate(-0.001, Add, 0.0).unwrap();
        assert_eq!(format_result(calculation.result), "0.0");
    }

    #[test]
    fn it_formats_numbered_and_unnumbered_records() {
        let calculation = Calculation::evaluate(3.0, Add, 4.0).unwrap();
        assert_eq!(calculation.record(None), "**Calculo** ===>> 3 + 4 = 7.0");
        assert_eq!(calculation.record(Some(2)), "**Calculo 2** ===>> 3 + 4 = 7.0");
    }

    #[test]
    fn evaluate_rounds_the_result() {
        let calculation = Calculation::evaluate(10.0, Divide, 3.0).unwrap();
        assert_eq!(calculation.to_string(), "10 / 3 = 3.33");
    }
}
