use crate::Classroom;
use db::Database;
use model::{Account, Id, Participant, Principal, Role};

pub struct Fixture {
    pub classroom: Classroom,
    pub professor: Principal,
    /// A second professor who owns nothing of the first one's.
    pub rival: Principal,
    pub student: Principal,
    pub admin: Principal,
    /// A student who never confirmed their e-mail address.
    pub unverified: Principal,
}

fn enroll(db: &Database, session: &str, verified: bool, roles: &[Role]) -> Principal {
    let id = db.next_id();
    db.register(Account {
        session: session.into(),
        user: Participant {
            id,
            username: Some(session.into()),
            verified,
            roles: roles.iter().copied().collect(),
            groups: Vec::new(),
            profile: Default::default(),
        },
    });
    Principal::User(id)
}

impl Fixture {
    pub fn new() -> Self {
        let db = Database::default();
        let professor = enroll(&db, "professor", true, &[Role::Professor]);
        let rival = enroll(&db, "rival", true, &[Role::Professor]);
        let student = enroll(&db, "student", true, &[Role::Student]);
        let admin = enroll(&db, "admin", true, &[Role::Admin]);
        let unverified = enroll(&db, "unverified", false, &[Role::Student, Role::Professor]);
        Self { classroom: db.into(), professor, rival, student, admin, unverified }
    }

    pub fn id(principal: &Principal) -> Id {
        principal.as_user().unwrap()
    }

    /// A group owned by `professor`.
    pub fn group(&self) -> Id {
        self.classroom.create_group(&self.professor, String::from("Calculus")).unwrap()
    }

    pub fn quiz(&self, group: Id) -> Id {
        self.classroom.create_quiz(&self.professor, String::from("Week 1"), group).unwrap()
    }

    /// "2+2?" with choices `["3", "4", "5"]`, correct index 1.
    pub fn question(&self, quiz: Id, group: Id) -> Id {
        let choices = ["3", "4", "5"].map(String::from).to_vec();
        self.classroom.create_question(&self.professor, quiz, group, String::from("2+2?"), choices, 1).unwrap()
    }

    /// A group with one quiz holding one question, which `student` has joined.
    pub fn setup(&self) -> (Id, Id, Id) {
        let group = self.group();
        let quiz = self.quiz(group);
        let question = self.question(quiz, group);
        self.classroom.join_group(&self.student, group).unwrap();
        (group, quiz, question)
    }
}
