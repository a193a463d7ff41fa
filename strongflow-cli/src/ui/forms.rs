use crate::models::{Exercise, InputError, MeasurementEntry, TrainingEntry};

/// Single-line text input
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub value: String,
    masked: bool,
    numeric: bool,
}

impl TextField {
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn numeric() -> Self {
        Self {
            numeric: true,
            ..Self::default()
        }
    }

    /// Append a character; numeric fields take digits and one decimal separator
    pub fn push(&mut self, c: char) {
        if !self.numeric {
            if !c.is_control() {
                self.value.push(c);
            }
            return;
        }

        match c {
            '0'..='9' => self.value.push(c),
            '.' | ',' if !self.value.contains('.') => self.value.push('.'),
            _ => {}
        }
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Text shown on screen
    pub fn display(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: TextField,
    pub password: TextField,
    pub focus: LoginField,
    pub mode: AuthMode,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: TextField::default(),
            password: TextField::masked(),
            focus: LoginField::Email,
            mode: AuthMode::SignIn,
        }
    }
}

impl LoginForm {
    fn focused(&mut self) -> &mut TextField {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn pop(&mut self) {
        self.focused().pop();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
    }

    /// Trimmed email and raw password, both required
    pub fn credentials(&self) -> Result<(String, String), InputError> {
        if self.email.is_empty() {
            return Err(InputError::Missing("email"));
        }
        if self.password.value.is_empty() {
            return Err(InputError::Missing("password"));
        }
        Ok((self.email.value.trim().to_string(), self.password.value.clone()))
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingField {
    #[default]
    Exercise,
    Weight,
    Reps,
}

#[derive(Debug, Clone)]
pub struct TrainingForm {
    pub exercise: Exercise,
    pub weight: TextField,
    pub reps: TextField,
    pub focus: TrainingField,
}

impl Default for TrainingForm {
    fn default() -> Self {
        Self {
            exercise: Exercise::default(),
            weight: TextField::numeric(),
            reps: TextField::numeric(),
            focus: TrainingField::Exercise,
        }
    }
}

impl TrainingForm {
    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            TrainingField::Exercise => TrainingField::Weight,
            TrainingField::Weight => TrainingField::Reps,
            TrainingField::Reps => TrainingField::Exercise,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            TrainingField::Exercise => TrainingField::Reps,
            TrainingField::Weight => TrainingField::Exercise,
            TrainingField::Reps => TrainingField::Weight,
        };
    }

    pub fn push(&mut self, c: char) {
        match self.focus {
            TrainingField::Exercise => {}
            TrainingField::Weight => self.weight.push(c),
            TrainingField::Reps => {
                // Repetitions are whole numbers
                if c.is_ascii_digit() {
                    self.reps.push(c);
                }
            }
        }
    }

    pub fn pop(&mut self) {
        match self.focus {
            TrainingField::Exercise => {}
            TrainingField::Weight => self.weight.pop(),
            TrainingField::Reps => self.reps.pop(),
        }
    }

    pub fn next_exercise(&mut self) {
        self.exercise = self.exercise.next();
    }

    pub fn prev_exercise(&mut self) {
        self.exercise = self.exercise.prev();
    }

    pub fn entry(&self) -> Result<TrainingEntry, InputError> {
        TrainingEntry::from_inputs(self.exercise, &self.weight.value, &self.reps.value)
    }

    /// Clear the numbers after a save; the exercise choice is kept
    pub fn reset(&mut self) {
        self.weight.clear();
        self.reps.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementField {
    #[default]
    Glutes,
    Thigh,
}

#[derive(Debug, Clone)]
pub struct MeasurementForm {
    pub glutes: TextField,
    pub thigh: TextField,
    pub focus: MeasurementField,
}

impl Default for MeasurementForm {
    fn default() -> Self {
        Self {
            glutes: TextField::numeric(),
            thigh: TextField::numeric(),
            focus: MeasurementField::Glutes,
        }
    }
}

impl MeasurementForm {
    fn focused(&mut self) -> &mut TextField {
        match self.focus {
            MeasurementField::Glutes => &mut self.glutes,
            MeasurementField::Thigh => &mut self.thigh,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            MeasurementField::Glutes => MeasurementField::Thigh,
            MeasurementField::Thigh => MeasurementField::Glutes,
        };
    }

    pub fn push(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn pop(&mut self) {
        self.focused().pop();
    }

    pub fn entry(&self) -> Result<MeasurementEntry, InputError> {
        MeasurementEntry::from_inputs(&self.glutes.value, &self.thigh.value)
    }

    pub fn reset(&mut self) {
        self.glutes.clear();
        self.thigh.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_field_filters_input() {
        let mut field = TextField::numeric();
        for c in "4a2,5.1".chars() {
            field.push(c);
        }
        assert_eq!(field.value, "42.51");
    }

    #[test]
    fn test_masked_display() {
        let mut field = TextField::masked();
        for c in "secret".chars() {
            field.push(c);
        }
        assert_eq!(field.display(), "••••••");
        assert_eq!(field.value, "secret");
    }

    #[test]
    fn test_training_form_reset_keeps_exercise() {
        let mut form = TrainingForm::default();
        form.next_exercise();
        form.focus_next();
        form.push('3');
        form.push('0');
        form.focus_next();
        form.push('1');
        form.push('.');
        form.push('2');

        let entry = form.entry().unwrap();
        assert_eq!(entry.exercise_name, Exercise::HipThrust);
        assert_eq!(entry.weight, 30.0);
        assert_eq!(entry.reps, 12);

        form.reset();
        assert!(form.weight.is_empty());
        assert!(form.reps.is_empty());
        assert_eq!(form.exercise, Exercise::HipThrust);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut form = LoginForm::default();
        for c in "ana@example.com".chars() {
            form.push(c);
        }
        assert_eq!(form.credentials(), Err(InputError::Missing("password")));

        form.toggle_focus();
        form.push('x');
        assert_eq!(
            form.credentials(),
            Ok(("ana@example.com".to_string(), "x".to_string()))
        );
    }
}
