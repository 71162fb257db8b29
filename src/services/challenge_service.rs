use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
        }
    }
}

/// Arithmetic question a human answers before a form may be submitted.
/// Only the question ever leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    left: i64,
    right: i64,
    operator: Operator,
}

impl Challenge {
    pub fn new(left: i64, right: i64, operator: Operator) -> Self {
        Self {
            left,
            right,
            operator,
        }
    }

    /// Two operands in 1..=10 and a random operator. Subtraction puts the
    /// larger operand first so answers stay non-negative.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let a = rng.gen_range(1..=10);
        let b = rng.gen_range(1..=10);
        let operator = Operator::ALL[rng.gen_range(0..Operator::ALL.len())];

        let (left, right) = match operator {
            Operator::Subtract if b > a => (b, a),
            _ => (a, b),
        };

        Self::new(left, right, operator)
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn question(&self) -> String {
        format!(
            "What is {} {} {}?",
            self.left,
            self.operator.symbol(),
            self.right
        )
    }

    pub fn expected(&self) -> i64 {
        match self.operator {
            Operator::Add => self.left + self.right,
            Operator::Subtract => self.left - self.right,
            Operator::Multiply => self.left * self.right,
        }
    }

    pub fn verify(&self, answer: &str) -> bool {
        answer
            .trim()
            .parse::<i64>()
            .map(|value| value == self.expected())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_expected_answers() {
        assert_eq!(Challenge::new(3, 4, Operator::Add).expected(), 7);
        assert_eq!(Challenge::new(9, 4, Operator::Subtract).expected(), 5);
        assert_eq!(Challenge::new(6, 7, Operator::Multiply).expected(), 42);
    }

    #[test]
    fn test_verify_trims_and_rejects_garbage() {
        let challenge = Challenge::new(2, 5, Operator::Multiply);
        assert!(challenge.verify(" 10 "));
        assert!(!challenge.verify("11"));
        assert!(!challenge.verify("ten"));
        assert!(!challenge.verify(""));
    }

    #[test]
    fn test_question_does_not_reveal_answer_format() {
        let challenge = Challenge::new(8, 3, Operator::Subtract);
        assert_eq!(challenge.question(), "What is 8 - 3?");
    }

    #[test]
    fn test_generated_operands_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let challenge = Challenge::generate(&mut rng);
            assert!((1..=10).contains(&challenge.left));
            assert!((1..=10).contains(&challenge.right));
            assert!(challenge.expected() >= 0);
        }
    }

    #[test]
    fn test_consecutive_challenges_vary() {
        let questions: Vec<String> = (0..20).map(|_| Challenge::random().question()).collect();
        assert!(questions.iter().any(|q| q != &questions[0]));
    }
}
