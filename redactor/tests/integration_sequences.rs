//! Collection redaction: one field table per sequence, one predicate decision
//! per field, applied to every element.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use redactor::{
    AllowAll, Applicator, CapabilityPredicate, CapabilitySet, ConfigurationError, Redact,
    Redactable,
};

#[derive(Clone, Debug, PartialEq, Redact)]
struct Employee {
    name: String,
    #[redact("salary:read")]
    salary: Redactable<u32>,
    #[redact("ssn:read")]
    ssn: Redactable<String>,
}

fn employee(name: &str, salary: u32) -> Employee {
    Employee {
        name: name.into(),
        salary: Redactable::new(salary),
        ssn: Redactable::new(format!("{name}-ssn")),
    }
}

fn staff() -> Vec<Employee> {
    vec![employee("Ada", 100), employee("Grace", 200)]
}

struct Counting<'a> {
    calls: &'a Cell<usize>,
    grants: CapabilitySet,
}

impl CapabilityPredicate for Counting<'_> {
    fn has_capability(&self, capability: &str) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.grants.contains(capability)
    }
}

#[test]
fn sequence_withholds_every_element() {
    let mut staff = staff();
    staff.redact().unwrap();

    assert_eq!(staff.len(), 2);
    assert_eq!(staff[0].name, "Ada");
    assert_eq!(staff[1].name, "Grace");
    assert!(staff.iter().all(|employee| employee.salary.is_withheld()));
}

#[test]
fn sequence_is_classified_as_sequence() {
    let mut staff = staff();
    match Applicator::fail_closed(&mut staff) {
        Applicator::Sequence(sequence) => assert_eq!(sequence.len(), 2),
        _ => panic!("Expected a sequence applicator"),
    }
}

#[test]
fn predicate_consulted_once_per_field_not_per_element() {
    let calls = Cell::new(0);
    let predicate = Counting {
        calls: &calls,
        grants: ["ssn:read"].into_iter().collect(),
    };

    let mut staff: Vec<Employee> = (0..50).map(|i| employee("e", i)).collect();
    staff.redact_with(&predicate).unwrap();

    assert_eq!(calls.get(), 2);
    assert!(staff
        .iter()
        .all(|employee| employee.salary.is_withheld() && !employee.ssn.is_withheld()));
}

#[test]
fn empty_sequence_is_noop() {
    let calls = Cell::new(0);
    let predicate = Counting {
        calls: &calls,
        grants: CapabilitySet::new(),
    };

    let mut staff: Vec<Employee> = Vec::new();
    staff.redact_with(&predicate).unwrap();

    assert!(staff.is_empty());
    assert_eq!(calls.get(), 0);
}

#[test]
fn absent_elements_are_skipped() {
    let mut staff = vec![Some(employee("Ada", 100)), None, Some(employee("Grace", 200))];
    staff.redact().unwrap();

    assert_eq!(staff.len(), 3);
    assert!(staff[1].is_none());
    assert!(staff[0].as_ref().unwrap().salary.is_withheld());
    assert!(staff[2].as_ref().unwrap().salary.is_withheld());
}

#[test]
fn nested_sequences_are_flattened() {
    let mut teams = vec![staff(), vec![employee("Linus", 300)], Vec::new()];
    teams.redact().unwrap();

    assert_eq!(
        teams.iter().map(Vec::len).collect::<Vec<_>>(),
        vec![2, 1, 0]
    );
    assert!(teams
        .iter()
        .flatten()
        .all(|employee| employee.salary.is_withheld() && employee.ssn.is_withheld()));
}

#[test]
fn visible_collection_field_elements_are_still_gated() {
    #[derive(Redact)]
    struct Department {
        #[redact("department:staff:read")]
        staff: Redactable<Vec<Employee>>,
    }

    let mut department = Department {
        staff: Redactable::new(staff()),
    };
    department
        .redact_with(&|capability: &str| capability == "department:staff:read")
        .unwrap();

    let staff = department.staff.value().unwrap();
    assert_eq!(staff.len(), 2);
    assert!(staff.iter().all(|employee| employee.salary.is_withheld()));
}

#[test]
fn withheld_collection_field_is_dropped_whole() {
    #[derive(Redact)]
    struct Department {
        #[redact("department:staff:read")]
        staff: Redactable<Vec<Employee>>,
    }

    let mut department = Department {
        staff: Redactable::new(staff()),
    };
    department.redact().unwrap();
    assert!(department.staff.is_withheld());
}

#[test]
fn other_collections_preserve_order() {
    let mut queue: VecDeque<Employee> = staff().into_iter().collect();
    queue.redact().unwrap();
    assert_eq!(
        queue.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        ["Ada", "Grace"]
    );

    let mut fixed = [employee("Ada", 1), employee("Grace", 2)];
    fixed.redact().unwrap();
    assert!(fixed.iter().all(|employee| employee.ssn.is_withheld()));

    let mut by_name: HashMap<String, Employee> = staff()
        .into_iter()
        .map(|employee| (employee.name.clone(), employee))
        .collect();
    by_name.redact().unwrap();
    assert!(by_name["Ada"].salary.is_withheld());
    assert!(by_name["Grace"].salary.is_withheld());
}

#[test]
fn sequence_of_leaves_is_noop() {
    let mut names = vec![String::from("Ada"), String::from("Grace")];
    names.redact().unwrap();
    assert_eq!(names, ["Ada", "Grace"]);
}

#[test]
fn variants_with_different_tables_are_rejected_before_mutation() {
    #[derive(Debug, Redact)]
    enum Contact {
        Email {
            #[redact("email:read")]
            address: Redactable<String>,
        },
        Phone {
            #[redact("phone:read")]
            number: Redactable<String>,
        },
    }

    let mut contacts = vec![
        Contact::Email {
            address: Redactable::new("a@example.com".into()),
        },
        Contact::Phone {
            number: Redactable::new("555-0100".into()),
        },
    ];

    let err = contacts.redact().unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::MixedSequence {
            expected: "Contact::Email",
            found: "Contact::Phone",
            index: 1,
        }
    );

    match &contacts[0] {
        Contact::Email { address } => assert!(!address.is_withheld()),
        Contact::Phone { .. } => panic!("Wrong variant"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Redact)]
enum Role {
    Admin,
    Member,
}

#[test]
fn unit_variants_mix_in_one_sequence() {
    #[derive(Redact)]
    struct Account {
        #[redact("roles:read")]
        roles: Redactable<Vec<Role>>,
    }

    let mut account = Account {
        roles: Redactable::new(vec![Role::Admin, Role::Member, Role::Admin]),
    };
    account.redact_with(&AllowAll).unwrap();
    assert_eq!(
        account.roles.value().map(Vec::as_slice),
        Some(&[Role::Admin, Role::Member, Role::Admin][..])
    );

    account.redact().unwrap();
    assert!(account.roles.is_withheld());
}

#[test]
fn variants_with_equal_tables_mix_in_one_sequence() {
    #[derive(Debug, Redact)]
    enum Payment {
        Card {
            holder: String,
            #[redact("payment:number:read")]
            number: Redactable<String>,
        },
        Bank {
            holder: String,
            #[redact("payment:number:read")]
            number: Redactable<String>,
        },
    }

    let mut payments = vec![
        Payment::Card {
            holder: "Ada".into(),
            number: Redactable::new("4111".into()),
        },
        Payment::Bank {
            holder: "Grace".into(),
            number: Redactable::new("DE89".into()),
        },
    ];

    payments.redact().unwrap();

    for payment in &payments {
        match payment {
            Payment::Card { holder, number } | Payment::Bank { holder, number } => {
                assert!(!holder.is_empty());
                assert!(number.is_withheld());
            }
        }
    }

    let mut granted = vec![Payment::Bank {
        holder: "Linus".into(),
        number: Redactable::new("GB33".into()),
    }];
    granted
        .redact_with(&|capability: &str| capability == "payment:number:read")
        .unwrap();
    match &granted[0] {
        Payment::Bank { number, .. } => assert_eq!(number.value().unwrap(), "GB33"),
        Payment::Card { .. } => panic!("Wrong variant"),
    }
}
