//! Request bodies for creating and editing income sources.

use serde::Deserialize;

use crate::{
    Error,
    income_source::{IncomeSourceUpdate, NewIncomeSource},
    json::{non_blank, parse_date},
};

fn check_amount(amount: f64) -> Result<f64, Error> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidField(
            "Amount must be a positive number".to_owned(),
        ));
    }

    Ok(amount)
}

/// The JSON body for creating an income source.
#[derive(Debug, Default, Deserialize)]
pub struct IncomeSourceForm {
    /// The name of the source.
    #[serde(default)]
    pub source_name: Option<String>,
    /// The amount received each time.
    #[serde(default)]
    pub amount: Option<f64>,
    /// How often the income is received.
    #[serde(default)]
    pub frequency: Option<String>,
    /// The next date in the format `YYYY-MM-DD`.
    #[serde(default)]
    pub next_date: Option<String>,
}

impl IncomeSourceForm {
    /// Check every field is present and convert the form into a [NewIncomeSource].
    ///
    /// # Errors
    ///
    /// Returns an [Error::MissingFields] if any field is missing, or an
    /// [Error::InvalidField] if the amount is not positive or the date cannot be parsed.
    pub fn validate(self) -> Result<NewIncomeSource, Error> {
        let (Some(source_name), Some(amount), Some(frequency), Some(next_date)) = (
            non_blank(self.source_name),
            self.amount,
            non_blank(self.frequency),
            non_blank(self.next_date),
        ) else {
            return Err(Error::MissingFields("All fields required"));
        };

        Ok(NewIncomeSource {
            source_name: source_name.trim().to_owned(),
            amount: check_amount(amount)?,
            frequency: frequency.trim().to_owned(),
            next_date: parse_date("next_date", &next_date)?,
        })
    }
}

/// The JSON body for editing an income source, where every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct EditIncomeSourceForm {
    /// The new name, blank to keep the current one.
    #[serde(default)]
    pub source_name: Option<String>,
    /// The new amount.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new frequency, blank to keep the current one.
    #[serde(default)]
    pub frequency: Option<String>,
    /// The new next date, blank to keep the current one.
    #[serde(default)]
    pub next_date: Option<String>,
    /// Whether the income is still received, defaults to true.
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl EditIncomeSourceForm {
    /// Convert the form into an [IncomeSourceUpdate].
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidField] if a given amount is not positive or a
    /// given date cannot be parsed.
    pub fn validate(self) -> Result<IncomeSourceUpdate, Error> {
        Ok(IncomeSourceUpdate {
            source_name: non_blank(self.source_name).map(|name| name.trim().to_owned()),
            amount: self.amount.map(check_amount).transpose()?,
            frequency: non_blank(self.frequency).map(|frequency| frequency.trim().to_owned()),
            next_date: non_blank(self.next_date)
                .map(|date| parse_date("next_date", &date))
                .transpose()?,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        income_source::{IncomeSourceUpdate, NewIncomeSource},
    };

    use super::{EditIncomeSourceForm, IncomeSourceForm};

    fn valid_form() -> IncomeSourceForm {
        IncomeSourceForm {
            source_name: Some("Salary".to_owned()),
            amount: Some(3000.0),
            frequency: Some("monthly".to_owned()),
            next_date: Some("2024-02-01".to_owned()),
        }
    }

    #[test]
    fn valid_form_is_converted() {
        assert_eq!(
            valid_form().validate(),
            Ok(NewIncomeSource {
                source_name: "Salary".to_owned(),
                amount: 3000.0,
                frequency: "monthly".to_owned(),
                next_date: date!(2024 - 02 - 01),
            })
        );
    }

    #[test]
    fn every_field_is_required() {
        let forms = [
            IncomeSourceForm {
                source_name: None,
                ..valid_form()
            },
            IncomeSourceForm {
                amount: None,
                ..valid_form()
            },
            IncomeSourceForm {
                frequency: Some("".to_owned()),
                ..valid_form()
            },
            IncomeSourceForm {
                next_date: None,
                ..valid_form()
            },
        ];

        for form in forms {
            assert_eq!(form.validate(), Err(Error::MissingFields("All fields required")));
        }
    }

    #[test]
    fn amount_must_be_positive() {
        let form = IncomeSourceForm {
            amount: Some(0.0),
            ..valid_form()
        };

        assert!(matches!(form.validate(), Err(Error::InvalidField(_))));
    }

    #[test]
    fn empty_edit_only_reactivates() {
        assert_eq!(
            EditIncomeSourceForm::default().validate(),
            Ok(IncomeSourceUpdate {
                source_name: None,
                amount: None,
                frequency: None,
                next_date: None,
                is_active: true,
            })
        );
    }

    #[test]
    fn edit_with_bad_date_is_rejected() {
        let form = EditIncomeSourceForm {
            next_date: Some("soon".to_owned()),
            ..Default::default()
        };

        assert!(matches!(form.validate(), Err(Error::InvalidField(_))));
    }
}
