//! Field transformers.
//!
//! Each submodule holds the pure, per-cell logic for one raw column. The
//! [`super::pipeline`] stages read cells from the table, call these
//! functions and write the derived cells back.
//!
//! | Module | Raw column | Derived columns |
//! |--------|------------|-----------------|
//! | [`text`] | `Company`, rating | same column |
//! | [`experience`] | `Experience` | `Min_Experience`, `Max_Experience` |
//! | [`salary`] | `Salary` | `Min_Salary`, `Max_Salary`, `Average_Salary` |
//! | [`posted`] | `Posted On` | `Days Posted On`, `Date Posted` |
//! | [`applications`] | `Applications` | same column |
//! | [`education`] | `Education` | `UG`, `PG`, `Doctorate` |
//! | [`lists`] | `Location`, `Key Skills` | same column, as sorted sets |

pub mod applications;
pub mod education;
pub mod experience;
pub mod lists;
pub mod posted;
pub mod salary;
pub mod text;

pub use applications::parse_applications;
pub use education::{
    parse_education, EducationLevel, EducationLevels, EducationRule, EducationVocabulary,
    NOT_SPECIFIED,
};
pub use experience::{matches_experience, parse_experience, ExperienceRange};
pub use lists::{clean_location, clean_skill, strip_parentheticals};
pub use posted::{parse_days_ago, resolve_posted_date, OVER_THIRTY_DAYS};
pub use salary::{parse_salary, SalaryRange, SalarySubstituter, SalarySubstitution, LAC};
pub use text::{parse_rating, rating_mode, round_rating, sanitize_company};
