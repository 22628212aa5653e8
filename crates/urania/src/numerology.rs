//! Pythagorean numerology: birth-date and name numbers.
//!
//! Latin letters use the 1-9 Pythagorean cycle (A=1 ... I=9, J=1 ...); Cyrillic
//! letters use the same cycle over the 33-letter Russian alphabet.

use crate::error::{Result, UraniaError};
use crate::time::BirthData;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numbers that are never reduced further.
pub const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

const CYRILLIC: &str = "абвгдеёжзийклмнопрстуфхцчшщъыьэюя";
const CYRILLIC_VOWELS: &str = "аеёиоуыэюя";
const LATIN_VOWELS: &str = "aeiou";

pub fn is_master(n: u32) -> bool {
    MASTER_NUMBERS.contains(&n)
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Digit-sum until a single digit or a master number remains.
pub fn reduce(mut n: u32) -> u32 {
    while n > 9 && !is_master(n) {
        n = digit_sum(n);
    }
    n
}

/// Value of a letter and whether it is a vowel. Non-letters yield `None`.
pub fn letter_value(c: char) -> Option<(u32, bool)> {
    let lower = c.to_lowercase().next()?;
    if lower.is_ascii_lowercase() {
        let index = u32::from(lower) - u32::from('a');
        return Some((index % 9 + 1, LATIN_VOWELS.contains(lower)));
    }
    let index = CYRILLIC.chars().position(|l| l == lower)?;
    // position is < 33, always fits
    Some((index as u32 % 9 + 1, CYRILLIC_VOWELS.contains(lower)))
}

fn name_letters(name: &str) -> Result<Vec<(u32, bool)>> {
    let letters: Vec<(u32, bool)> = name.chars().filter_map(letter_value).collect();
    if letters.is_empty() {
        return Err(UraniaError::InvalidInput(format!(
            "name '{}' contains no Latin or Cyrillic letters",
            name
        )));
    }
    Ok(letters)
}

fn name_number(name: &str, keep: impl Fn(bool) -> bool) -> Result<u32> {
    let sum = name_letters(name)?
        .into_iter()
        .filter(|&(_, vowel)| keep(vowel))
        .map(|(value, _)| value)
        .sum();
    Ok(reduce(sum))
}

/// Every letter of the full name.
pub fn expression_number(name: &str) -> Result<u32> {
    name_number(name, |_| true)
}

/// Vowels only. Also called the heart's desire number.
pub fn soul_urge_number(name: &str) -> Result<u32> {
    name_number(name, |vowel| vowel)
}

/// Consonants only.
pub fn personality_number(name: &str) -> Result<u32> {
    name_number(name, |vowel| !vowel)
}

/// Month, day and year are reduced separately before the final sum.
pub fn life_path(year: i32, month: u32, day: u32) -> Result<u32> {
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(UraniaError::InvalidInput(format!(
            "{}-{:02}-{:02} is not a calendar date",
            year, month, day
        )));
    }
    Ok(reduce(reduce(month) + reduce(day) + reduce(year.unsigned_abs())))
}

pub fn birthday_number(day: u32) -> u32 {
    reduce(day)
}

/// Cycle number of `target_year` for someone born on `month`/`day`.
pub fn personal_year(month: u32, day: u32, target_year: i32) -> u32 {
    reduce(reduce(month) + reduce(day) + reduce(target_year.unsigned_abs()))
}

/// Full numerology reading for a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumerologyReport {
    pub life_path: u32,
    pub birthday: u32,
    pub personal_year: u32,
    pub expression: u32,
    pub soul_urge: u32,
    pub personality: u32,
    /// Master numbers among the values above, in field order.
    pub master_numbers: Vec<u32>,
}

pub fn reading(name: &str, birth: &BirthData, target_year: i32) -> Result<NumerologyReport> {
    let life_path = life_path(birth.year, birth.month, birth.day)?;
    let birthday = birthday_number(birth.day);
    let personal_year = personal_year(birth.month, birth.day, target_year);
    let expression = expression_number(name)?;
    let soul_urge = soul_urge_number(name)?;
    let personality = personality_number(name)?;

    let master_numbers = [life_path, birthday, personal_year, expression, soul_urge, personality]
        .into_iter()
        .filter(|n| is_master(*n))
        .collect();

    Ok(NumerologyReport {
        life_path,
        birthday,
        personal_year,
        expression,
        soul_urge,
        personality,
        master_numbers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_keeps_master_numbers() {
        assert_eq!(reduce(0), 0);
        assert_eq!(reduce(7), 7);
        assert_eq!(reduce(29), 11);
        assert_eq!(reduce(38), 11);
        assert_eq!(reduce(1990), 1);
        assert_eq!(reduce(22), 22);
        assert_eq!(reduce(44), 8);
    }

    #[test]
    fn test_life_path() {
        assert_eq!(life_path(1990, 5, 15).unwrap(), 3);
        // 11 + 11 + (1+9+8+0=18 -> 9) = 31 -> 4
        assert_eq!(life_path(1980, 11, 29).unwrap(), 4);
        assert!(life_path(2023, 2, 29).is_err());
    }

    #[test]
    fn test_letter_values() {
        assert_eq!(letter_value('A'), Some((1, true)));
        assert_eq!(letter_value('j'), Some((1, false)));
        assert_eq!(letter_value('z'), Some((8, false)));
        assert_eq!(letter_value('а'), Some((1, true)));
        assert_eq!(letter_value('Я'), Some((6, true)));
        assert_eq!(letter_value('-'), None);
    }

    #[test]
    fn test_name_numbers() {
        // J1 O6 H8 N5 = 20 -> 2
        assert_eq!(expression_number("John").unwrap(), 2);
        assert_eq!(soul_urge_number("John").unwrap(), 6);
        assert_eq!(personality_number("John").unwrap(), 5);
        assert!(expression_number("  42 ").is_err());
    }
}
