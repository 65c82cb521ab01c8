//! Reader for the ITC-2007 track 3 (`.ctt`) instance format.
//!
//! ```text
//! Name: Toy
//! Courses: 2
//! Rooms: 1
//! Days: 5
//! Periods_per_day: 4
//! Curricula: 1
//! Constraints: 1
//!
//! COURSES:
//! SceCosC Ocra 3 3 30
//! ArcTec Indaco 3 2 42
//!
//! ROOMS:
//! A 32
//!
//! CURRICULA:
//! Cur1 2 SceCosC ArcTec
//!
//! UNAVAILABILITY_CONSTRAINTS:
//! ArcTec 4 0
//!
//! END.
//! ```

use std::path::Path;

use super::builder::TimetableModelBuilder;
use super::types::TimetableModel;
use crate::error::TimetableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Courses,
    Rooms,
    Curricula,
    Unavailability,
    End,
}

#[derive(Debug, Default)]
struct Header {
    name: Option<String>,
    courses: Option<usize>,
    rooms: Option<usize>,
    days: Option<usize>,
    slots: Option<usize>,
    curricula: Option<usize>,
    constraints: Option<usize>,
}

impl TimetableModel {
    /// Parses an instance in `.ctt` format.
    pub fn parse(text: &str) -> Result<Self, TimetableError> {
        let mut section = Section::Header;
        let mut header = Header::default();
        let mut builder: Option<TimetableModelBuilder> = None;
        let mut counts = [0usize; 4];

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let next = match line {
                "COURSES:" => Some(Section::Courses),
                "ROOMS:" => Some(Section::Rooms),
                "CURRICULA:" => Some(Section::Curricula),
                "UNAVAILABILITY_CONSTRAINTS:" => Some(Section::Unavailability),
                "END." => Some(Section::End),
                _ => None,
            };
            if let Some(next) = next {
                if section == Section::Header {
                    builder = Some(header.start(line_no)?);
                }
                section = next;
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            match section {
                Section::Header => header.read(line_no, line)?,
                Section::Courses => {
                    expect_fields(line_no, &fields, 5)?;
                    let b = take(&mut builder, line_no)?;
                    builder = Some(b.add_course(
                        fields[0],
                        fields[1],
                        number(line_no, fields[2])?,
                        number(line_no, fields[3])?,
                        number(line_no, fields[4])?,
                    ));
                    counts[0] += 1;
                }
                Section::Rooms => {
                    expect_fields(line_no, &fields, 2)?;
                    let b = take(&mut builder, line_no)?;
                    builder = Some(b.add_room(fields[0], number(line_no, fields[1])?));
                    counts[1] += 1;
                }
                Section::Curricula => {
                    if fields.len() < 2 {
                        return Err(TimetableError::parse(line_no, "curriculum needs id and size"));
                    }
                    let n: usize = number(line_no, fields[1])?;
                    expect_fields(line_no, &fields, n + 2)?;
                    let b = take(&mut builder, line_no)?;
                    builder = Some(b.add_curriculum(fields[0], &fields[2..]));
                    counts[2] += 1;
                }
                Section::Unavailability => {
                    expect_fields(line_no, &fields, 3)?;
                    let b = take(&mut builder, line_no)?;
                    builder = Some(b.add_unavailability(
                        fields[0],
                        number(line_no, fields[1])?,
                        number(line_no, fields[2])?,
                    ));
                    counts[3] += 1;
                }
                Section::End => {
                    return Err(TimetableError::parse(line_no, "content after END."));
                }
            }
        }

        if section != Section::End {
            return Err(TimetableError::parse(0, "missing END. marker"));
        }
        let builder = builder.ok_or_else(|| TimetableError::parse(0, "missing sections"))?;

        let declared = [
            ("courses", header.courses),
            ("rooms", header.rooms),
            ("curricula", header.curricula),
            ("constraints", header.constraints),
        ];
        for ((what, expected), found) in declared.iter().zip(counts) {
            if let Some(expected) = expected {
                if *expected != found {
                    return Err(TimetableError::InvalidModel(format!(
                        "header declares {expected} {what}, found {found}"
                    )));
                }
            }
        }

        builder.build()
    }

    /// Reads and parses an instance file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TimetableError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

impl Header {
    fn read(&mut self, line_no: usize, line: &str) -> Result<(), TimetableError> {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| TimetableError::parse(line_no, format!("expected `Key: value`, got {line:?}")))?;
        let value = value.trim();
        match key.trim() {
            "Name" => self.name = Some(value.to_string()),
            "Courses" => self.courses = Some(number(line_no, value)?),
            "Rooms" => self.rooms = Some(number(line_no, value)?),
            "Days" => self.days = Some(number(line_no, value)?),
            "Periods_per_day" => self.slots = Some(number(line_no, value)?),
            "Curricula" => self.curricula = Some(number(line_no, value)?),
            "Constraints" => self.constraints = Some(number(line_no, value)?),
            other => {
                return Err(TimetableError::parse(line_no, format!("unknown header field {other}")))
            }
        }
        Ok(())
    }

    fn start(&self, line_no: usize) -> Result<TimetableModelBuilder, TimetableError> {
        let days = self
            .days
            .ok_or_else(|| TimetableError::parse(line_no, "header is missing Days"))?;
        let slots = self
            .slots
            .ok_or_else(|| TimetableError::parse(line_no, "header is missing Periods_per_day"))?;
        let name = self.name.clone().unwrap_or_default();
        Ok(TimetableModelBuilder::new(name, days, slots))
    }
}

fn take(
    builder: &mut Option<TimetableModelBuilder>,
    line_no: usize,
) -> Result<TimetableModelBuilder, TimetableError> {
    builder
        .take()
        .ok_or_else(|| TimetableError::parse(line_no, "section data before header"))
}

fn expect_fields(line_no: usize, fields: &[&str], n: usize) -> Result<(), TimetableError> {
    if fields.len() != n {
        return Err(TimetableError::parse(
            line_no,
            format!("expected {n} fields, found {}", fields.len()),
        ));
    }
    Ok(())
}

fn number<T: std::str::FromStr>(line_no: usize, field: &str) -> Result<T, TimetableError> {
    field
        .parse()
        .map_err(|_| TimetableError::parse(line_no, format!("invalid number {field:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY: &str = "\
Name: Toy
Courses: 4
Rooms: 3
Days: 5
Periods_per_day: 4
Curricula: 2
Constraints: 3

COURSES:
SceCosC Ocra 3 3 30
ArcTec Indaco 3 2 42
TecCos Rosa 5 4 40
Geotec Scarlatti 5 4 18

ROOMS:
A 32
B 50
C 40

CURRICULA:
Cur1 3 SceCosC ArcTec TecCos
Cur2 2 TecCos Geotec

UNAVAILABILITY_CONSTRAINTS:
TecCos 2 0
TecCos 2 1
ArcTec 4 3

END.
";

    #[test]
    fn test_parse_toy_instance() {
        let model = TimetableModel::parse(TOY).unwrap();
        assert_eq!(model.name(), "Toy");
        assert_eq!(model.n_days(), 5);
        assert_eq!(model.n_slots(), 4);
        assert_eq!(model.n_courses(), 4);
        assert_eq!(model.n_rooms(), 3);
        assert_eq!(model.n_curricula(), 2);
        assert_eq!(model.n_lectures(), 16);
        assert_eq!(model.rooms()[1].capacity, 50);

        let teccos = model.course_index("TecCos").unwrap();
        assert_eq!(model.courses()[teccos].curricula, vec![0, 1]);
        assert!(model.is_unavailable(teccos, 2, 1));
        assert!(!model.is_unavailable(teccos, 3, 1));
    }

    #[test]
    fn test_header_count_mismatch() {
        let text = TOY.replace("Rooms: 3", "Rooms: 4");
        let err = TimetableModel::parse(&text).unwrap_err();
        assert!(matches!(err, TimetableError::InvalidModel(_)));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let text = TOY.replace("B 50", "B fifty");
        match TimetableModel::parse(&text).unwrap_err() {
            TimetableError::Parse { line, .. } => assert_eq!(line, 17),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_end() {
        let text = TOY.replace("END.", "");
        assert!(TimetableModel::parse(&text).is_err());
    }

    #[test]
    fn test_curriculum_size_mismatch() {
        let text = TOY.replace("Cur2 2 TecCos Geotec", "Cur2 3 TecCos Geotec");
        assert!(matches!(
            TimetableModel::parse(&text).unwrap_err(),
            TimetableError::Parse { .. }
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = TimetableModel::from_path("/nonexistent/instance.ctt").unwrap_err();
        assert!(matches!(err, TimetableError::Io(_)));
    }
}
