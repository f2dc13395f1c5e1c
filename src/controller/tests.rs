//! Tests for the list controller.

use super::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use bubbletea_rs::{KeyMsg, Msg};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Address {
        city: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        role: String,
        age: i64,
        address: Address,
        initialized: bool,
    }

    struct RawPerson {
        name: String,
        role: String,
        age: i64,
        city: String,
    }

    impl Searchable for Address {
        fn field(&self, name: &str) -> Option<Field<'_>> {
            match name {
                "city" => Some(Field::value(self.city.as_str())),
                _ => None,
            }
        }
    }

    impl Searchable for Person {
        fn field(&self, name: &str) -> Option<Field<'_>> {
            match name {
                "name" => Some(Field::value(self.name.as_str())),
                "role" => Some(Field::value(self.role.as_str())),
                "age" => Some(Field::value(self.age)),
                "address" => Some(Field::Nested(&self.address)),
                _ => None,
            }
        }
    }

    impl Entity for Person {
        type Raw = RawPerson;

        fn on_init(&mut self) {
            self.initialized = true;
        }
    }

    fn person(raw: RawPerson) -> Person {
        Person {
            name: raw.name,
            role: raw.role,
            age: raw.age,
            address: Address { city: raw.city },
            initialized: false,
        }
    }

    fn raw(name: &str, role: &str, age: i64, city: &str) -> RawPerson {
        RawPerson {
            name: name.to_string(),
            role: role.to_string(),
            age,
            city: city.to_string(),
        }
    }

    fn numbered(count: usize) -> Vec<RawPerson> {
        (1..=count)
            .map(|i| raw(&format!("Person {i}"), "dev", 20 + i as i64, "Porto"))
            .collect()
    }

    fn controller(page_size: usize, count: usize) -> ListController<Person> {
        let mut list = ListController::new(person).with_page_size(page_size);
        list.set_raw_list(numbered(count));
        list
    }

    fn team() -> ListController<Person> {
        let mut list = ListController::new(person).with_page_size(10);
        list.set_raw_list(vec![
            raw("Ana", "dev", 31, "Porto"),
            raw("Bruno", "ops", 45, "Lisboa"),
            raw("Carla", "dev", 28, "Lisboa"),
            raw("José Silva", "qa", 52, "Braga"),
            raw("Duarte", "ops", 0, "Faro"),
        ]);
        list
    }

    fn names(list: &ListController<Person>) -> Vec<String> {
        list.view_ids()
            .iter()
            .filter_map(|&id| list.get(id))
            .map(|p| p.name.clone())
            .collect()
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }) as Msg
    }

    #[test]
    fn test_new_defaults() {
        let list: ListController<Person> = ListController::new(person);
        assert_eq!(list.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(list.total(), 0);
        assert_eq!(list.total_page(), 0);
        assert_eq!(list.current_page(), 1);
        assert!(list.visible_pages().is_empty());
        assert_eq!(list.first_visible_page(), 0);
        assert_eq!(list.last_visible_page(), 0);
        assert!(!list.is_filtered());
        assert!(list.current_list().is_empty());
    }

    #[test]
    fn test_twelve_entities_five_per_page() {
        let mut list = controller(5, 12);
        assert_eq!(list.total(), 12);
        assert_eq!(list.total_page(), 3);
        assert_eq!(list.current_list().len(), 5);
        assert_eq!(list.visible_pages(), &[1, 2, 3]);
        assert!(list.on_first_page());

        list.next();
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.current_list()[0].name, "Person 6");

        list.next();
        assert_eq!(list.current_page(), 3);
        assert_eq!(list.items_on_page(), 2);
        assert!(list.on_last_page());

        list.next();
        assert_eq!(list.current_page(), 3);
        assert_eq!(list.items_on_page(), 2);
    }

    #[test]
    fn test_previous_on_first_page_is_noop() {
        let mut list = controller(5, 12);
        list.previous();
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.items_on_page(), 5);
    }

    #[test]
    fn test_page_size_zero_puts_everything_on_one_page() {
        let list = controller(0, 7);
        assert_eq!(list.total_page(), 1);
        assert_eq!(list.items_on_page(), 7);
        assert_eq!(list.visible_pages(), &[1]);
    }

    #[test]
    fn test_empty_list() {
        let mut list = controller(5, 0);
        assert_eq!(list.total(), 0);
        assert_eq!(list.total_page(), 0);
        assert!(list.current_list().is_empty());
        assert!(list.visible_pages().is_empty());

        list.next();
        list.previous();
        list.next_pages();
        list.previous_pages();
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn test_windows_slide_in_whole_lots() {
        // 23 pages
        let mut list = controller(5, 115);
        assert_eq!(list.total_page(), 23);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);

        for _ in 0..4 {
            list.next();
        }
        assert_eq!(list.current_page(), 5);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);

        list.next();
        assert_eq!(list.current_page(), 6);
        assert_eq!(list.visible_pages(), &[6, 7, 8, 9, 10]);

        list.previous();
        assert_eq!(list.current_page(), 5);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);

        for _ in 0..4 {
            list.previous();
        }
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_lot_jumps_at_the_end_of_the_range() {
        let mut list = controller(5, 115);
        for _ in 0..4 {
            list.next_pages();
        }
        assert_eq!(list.visible_pages(), &[21, 22, 23]);
        assert_eq!(list.current_page(), 21);

        list.next_pages();
        assert_eq!(list.visible_pages(), &[21, 22, 23]);
        assert_eq!(list.current_page(), 21);

        list.previous_pages();
        assert_eq!(list.visible_pages(), &[16, 17, 18, 19, 20]);
        assert_eq!(list.current_page(), 20);
    }

    #[test]
    fn test_set_page_out_of_range_from_first_page_is_empty() {
        let mut list = controller(5, 12);
        list.set_page(9);
        assert!(list.current_list().is_empty());
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn test_set_page_beyond_data_steps_back() {
        let mut list = controller(5, 12);
        list.set_page(3);
        assert_eq!(list.current_page(), 3);

        list.set_page(9);
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.items_on_page(), 5);
    }

    #[test]
    fn test_set_page_moves_the_window() {
        let mut list = controller(5, 115);
        list.set_page(8);
        assert_eq!(list.current_page(), 8);
        assert_eq!(list.visible_pages(), &[6, 7, 8, 9, 10]);

        list.next();
        assert_eq!(list.current_page(), 9);

        list.set_page(23);
        assert_eq!(list.visible_pages(), &[21, 22, 23]);

        list.set_page(2);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);
        list.previous();
        assert_eq!(list.current_page(), 1);
    }

    #[test]
    fn test_set_page_zero_is_first_page() {
        let mut list = controller(5, 12);
        list.set_page(2);
        list.set_page(0);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.current_list()[0].name, "Person 1");
    }

    #[test]
    fn test_materialization_is_lazy() {
        let mut list = controller(5, 12);
        let ids = list.original_ids().to_vec();

        assert!(list.get(ids[0]).is_some_and(|p| p.initialized));
        assert!(list.get(ids[4]).is_some());
        assert!(list.get(ids[7]).is_none());

        list.next();
        assert!(list.get(ids[7]).is_some_and(|p| p.initialized));
        assert!(list.get(ids[11]).is_none());

        let mut criteria = vec![Criterion::new("name", "person")];
        list.search(&mut criteria, MatchMode::All).unwrap();
        assert!(ids.iter().all(|&id| list.get(id).is_some()));
    }

    #[test]
    fn test_canonical_records_are_used_as_is() {
        let mut list: ListController<Person> = ListController::new(person);
        list.set_entities(numbered(3).into_iter().map(person));
        assert!(list.current_list().iter().all(|p| !p.initialized));
    }

    #[test]
    fn test_get_mut_materializes() {
        let mut list = controller(5, 12);
        let id = list.original_ids()[10];
        assert!(list.get(id).is_none());
        assert!(list.get_mut(id).is_some_and(|p| p.initialized));
        assert!(list.get(id).is_some());
    }

    #[test]
    fn test_and_versus_or() {
        let mut list = team();

        let mut criteria = vec![
            Criterion::new("role", "dev"),
            Criterion::new("address.city", "lisboa"),
        ];
        list.search(&mut criteria, MatchMode::All).unwrap();
        assert_eq!(names(&list), vec!["Carla"]);

        let mut criteria = vec![
            Criterion::new("role", "dev"),
            Criterion::new("address.city", "lisboa"),
        ];
        list.search(&mut criteria, MatchMode::Any).unwrap();
        assert_eq!(names(&list), vec!["Ana", "Bruno", "Carla"]);
    }

    #[test]
    fn test_accents_and_case_are_ignored() {
        let mut list = team();

        let mut accented = vec![Criterion::new("name", "José")];
        list.search(&mut accented, MatchMode::All).unwrap();
        let first = Rc::clone(list.filtered_view().unwrap());
        assert_eq!(names(&list), vec!["José Silva"]);
        assert!(matches!(&accented[0].value, CriterionValue::Scalar(Value::Text(s)) if s == "jose"));

        let mut plain = vec![Criterion::new("name", "jose")];
        list.search(&mut plain, MatchMode::All).unwrap();
        assert!(Rc::ptr_eq(&first, list.filtered_view().unwrap()));
    }

    #[test]
    fn test_identical_search_hits_the_cache() {
        let mut list = team();
        let criteria = vec![Criterion::new("role", "ops"), Criterion::new("name", "u")];

        list.search(&mut criteria.clone(), MatchMode::All).unwrap();
        let first = Rc::clone(list.filtered_view().unwrap());
        list.search(&mut criteria.clone(), MatchMode::All).unwrap();
        assert!(Rc::ptr_eq(&first, list.filtered_view().unwrap()));
        assert_eq!(names(&list), vec!["Bruno", "Duarte"]);
    }

    #[test]
    fn test_criteria_order_is_part_of_the_cache_key() {
        let mut list = team();
        let role = Criterion::new("role", "ops");
        let name = Criterion::new("name", "u");

        list.search(&mut vec![role.clone(), name.clone()], MatchMode::All)
            .unwrap();
        let first = Rc::clone(list.filtered_view().unwrap());
        list.search(&mut vec![name, role], MatchMode::All).unwrap();
        let second = list.filtered_view().unwrap();

        assert!(!Rc::ptr_eq(&first, second));
        assert_eq!(&*first, &**second);
    }

    #[test]
    fn test_vacuous_criteria_are_dropped() {
        let mut list = team();
        let mut criteria = vec![
            Criterion::new("name", ""),
            Criterion::new("name", Value::Null),
            Criterion::any_of("role", Vec::<Value>::new()),
            Criterion::predicate("age", "   ", |_: &Person| false),
        ];
        list.search(&mut criteria, MatchMode::All).unwrap();

        assert!(criteria.is_empty());
        assert!(!list.is_filtered());
        assert_eq!(list.total(), 5);
    }

    #[test]
    fn test_unnamed_predicate_is_rejected() {
        let mut list = team();
        let mut criteria = vec![Criterion::new("role", "dev")];
        list.search(&mut criteria, MatchMode::All).unwrap();

        let mut criteria = vec![Criterion {
            property: "age".to_string(),
            value: CriterionValue::Predicate(Rc::new(|p: &Person| p.age > 40)),
            cache_name: None,
        }];
        let err = list.search(&mut criteria, MatchMode::All).err();

        assert_eq!(
            err,
            Some(Error::MissingCacheName {
                property: "age".to_string()
            })
        );
        assert!(list.is_filtered());
        assert_eq!(list.total(), 2);
    }

    #[test]
    fn test_predicate_criteria() {
        let mut list = team();
        let mut criteria = vec![Criterion::predicate("age", "over-40", |p: &Person| {
            p.age > 40
        })];
        list.search(&mut criteria, MatchMode::All).unwrap();
        assert_eq!(names(&list), vec!["Bruno", "José Silva"]);
    }

    #[test]
    fn test_falsy_properties_are_skipped() {
        let mut list = team();
        // Duarte's age is 0, so the predicate never sees him.
        let mut criteria = vec![Criterion::predicate("age", "everyone", |_: &Person| true)];
        list.search(&mut criteria, MatchMode::All).unwrap();
        assert_eq!(list.total(), 4);
        assert!(!names(&list).contains(&"Duarte".to_string()));
    }

    #[test]
    fn test_list_criteria_match_any_element() {
        let mut list = team();
        let mut criteria = vec![Criterion::any_of("role", ["QA", "ops"])];
        list.search(&mut criteria, MatchMode::All).unwrap();
        assert_eq!(names(&list), vec!["Bruno", "José Silva", "Duarte"]);
    }

    #[test]
    fn test_numbers_match_by_loose_equality() {
        let mut list = team();
        list.search(&mut vec![Criterion::new("age", 31)], MatchMode::All)
            .unwrap();
        assert_eq!(names(&list), vec!["Ana"]);

        list.search(&mut vec![Criterion::new("age", "52")], MatchMode::All)
            .unwrap();
        assert_eq!(names(&list), vec!["José Silva"]);
    }

    #[test]
    fn test_missing_path_matches_nothing() {
        let mut list = team();
        list.search(&mut vec![Criterion::new("address.zip", "4000")], MatchMode::All)
            .unwrap();

        assert!(list.is_filtered());
        assert_eq!(list.total(), 0);
        assert_eq!(list.total_page(), 0);
        assert!(list.current_list().is_empty());
        assert!(list.visible_pages().is_empty());
    }

    #[test]
    fn test_search_restarts_from_first_page() {
        let mut list = controller(5, 40);
        list.next();
        list.next();
        assert_eq!(list.current_page(), 3);

        list.search(&mut vec![Criterion::new("name", "person 1")], MatchMode::All)
            .unwrap();
        // "Person 1" and "Person 10".."Person 19"
        assert_eq!(list.total(), 11);
        assert_eq!(list.current_page(), 1);
        assert_eq!(list.visible_pages(), &[1, 2, 3]);
    }

    #[test]
    fn test_get_mut_refreshes_normalized_values() {
        let mut list = team();
        let ana = list.original_ids()[0];
        list.search(&mut vec![Criterion::new("name", "ana")], MatchMode::All)
            .unwrap();
        assert_eq!(list.total(), 1);

        if let Some(p) = list.get_mut(ana) {
            p.name = "Zoë".to_string();
        }
        list.search(&mut vec![Criterion::new("name", "zoe")], MatchMode::All)
            .unwrap();
        assert_eq!(names(&list), vec!["Zoë"]);
    }

    #[test]
    fn test_remove_prunes_cached_views() {
        let mut list = team();
        let mut devs = vec![Criterion::new("role", "dev")];
        list.search(&mut devs.clone(), MatchMode::All).unwrap();
        assert_eq!(list.total(), 2);
        let carla = list.view_ids()[1];

        assert!(list.remove(carla));
        assert!(!list.is_filtered());
        assert_eq!(list.total(), 4);
        assert!(list.get(carla).is_none());

        list.search(&mut devs, MatchMode::All).unwrap();
        assert_eq!(list.total(), 1);
        assert!(!list.view_ids().contains(&carla));
    }

    #[test]
    fn test_remove_unknown_entity_changes_nothing() {
        let mut list = team();
        let stale = list.original_ids()[0];
        list.set_raw_list(vec![raw("Eva", "dev", 40, "Porto")]);
        list.search(&mut vec![Criterion::new("role", "dev")], MatchMode::All)
            .unwrap();
        let view = Rc::clone(list.filtered_view().unwrap());

        assert!(!list.remove(stale));
        assert!(list.is_filtered());
        assert!(Rc::ptr_eq(&view, list.filtered_view().unwrap()));
        assert_eq!(list.total(), 1);

        let eva = list.original_ids()[0];
        assert!(list.remove(eva));
        assert!(!list.remove(eva));
    }

    #[test]
    fn test_remove_clamps_current_page() {
        let mut list = controller(5, 12);
        list.next();
        list.next();
        let last_two = list.current_ids().to_vec();

        assert!(list.remove(last_two[0]));
        assert_eq!(list.current_page(), 3);
        assert_eq!(list.items_on_page(), 1);

        assert!(list.remove(last_two[1]));
        assert_eq!(list.total(), 10);
        assert_eq!(list.total_page(), 2);
        assert_eq!(list.current_page(), 2);
        assert_eq!(list.items_on_page(), 5);
    }

    #[test]
    fn test_remove_keeps_window_around_current_page() {
        let mut list = controller(5, 115);
        for _ in 0..6 {
            list.next();
        }
        assert_eq!(list.current_page(), 7);

        let first = list.original_ids()[0];
        list.remove(first);
        assert_eq!(list.current_page(), 7);
        assert_eq!(list.visible_pages(), &[6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_clean_resets_everything() {
        let mut list = team();
        list.search(&mut vec![Criterion::new("role", "dev")], MatchMode::All)
            .unwrap();
        assert!(!list.filter_cache.is_empty());

        list.clean();
        assert_eq!(list.total(), 0);
        assert!(list.current_list().is_empty());
        assert!(!list.is_filtered());
        assert!(list.filter_cache.is_empty());

        list.search(&mut vec![Criterion::new("role", "dev")], MatchMode::All)
            .unwrap();
        assert_eq!(list.total(), 0);
        assert_eq!(list.total_page(), 0);
    }

    #[test]
    fn test_custom_page_handler_replaces_default() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut list = ListController::new(person)
            .with_page_size(5)
            .with_page_handler(move |_, page| log.borrow_mut().push(page));
        list.set_raw_list(numbered(12));

        assert_eq!(*seen.borrow(), vec![1]);

        list.next();
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(list.current_page(), 2);
        // The handler did not load the page.
        assert_eq!(list.current_list()[0].name, "Person 1");
    }

    #[test]
    fn test_custom_page_handler_hears_about_shown_pages() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut list = ListController::new(person)
            .with_page_size(5)
            .with_page_handler(move |_, page| log.borrow_mut().push(page));

        list.set_raw_list(numbered(3));
        list.search(&mut vec![Criterion::new("name", "person")], MatchMode::All)
            .unwrap();
        assert_eq!(*seen.borrow(), vec![1, 1]);

        list.set_raw_list(numbered(12));
        list.set_page(3);
        let id = list.original_ids()[0];
        list.remove(id);
        assert_eq!(*seen.borrow(), vec![1, 1, 1, 3, 3]);

        // Nothing to show, nothing to report.
        list.clean();
        assert_eq!(seen.borrow().len(), 5);
    }

    #[test]
    fn test_custom_page_handler_can_call_default() {
        let mut list = ListController::new(person)
            .with_page_size(5)
            .with_page_handler(|list, page| {
                list.set_page(page);
                list.set_data("last_page", page);
            });
        list.set_raw_list(numbered(12));

        list.next();
        assert_eq!(list.current_list()[0].name, "Person 6");
        assert_eq!(list.data::<usize>("last_page"), Some(&2));

        list.next();
        assert_eq!(list.data::<usize>("last_page"), Some(&3));
    }

    #[test]
    fn test_builtin_filter_handler_searches() {
        let mut list = team();
        list.request_filter(&mut vec![Criterion::new("role", "qa")])
            .unwrap();
        assert_eq!(names(&list), vec!["José Silva"]);
    }

    #[test]
    fn test_custom_filter_handler_replaces_default() {
        let mut list = ListController::new(person).with_filter_handler(|list, criteria| {
            list.set_data("criteria", criteria.len());
            list.search(criteria, MatchMode::Any).map(|_| ())
        });
        list.set_raw_list(vec![
            raw("Ana", "dev", 31, "Porto"),
            raw("Bruno", "ops", 45, "Lisboa"),
        ]);

        list.request_filter(&mut vec![
            Criterion::new("role", "dev"),
            Criterion::new("address.city", "lisboa"),
        ])
        .unwrap();
        assert_eq!(list.data::<usize>("criteria"), Some(&2));
        assert_eq!(list.total(), 2);
    }

    #[test]
    fn test_data_store() {
        let mut list = team();
        list.set_data("selected", 3usize);
        assert_eq!(list.data::<usize>("selected"), Some(&3));
        assert_eq!(list.data::<String>("selected"), None);

        if let Some(selected) = list.data_mut::<usize>("selected") {
            *selected += 1;
        }
        assert_eq!(list.data::<usize>("selected"), Some(&4));

        // Independent of the entity list.
        list.clean();
        assert_eq!(list.data::<usize>("selected"), Some(&4));
        assert!(list.remove_data("selected"));
        assert!(!list.remove_data("selected"));
    }

    #[test]
    fn test_update_navigates_on_key_presses() {
        let mut list = controller(5, 115);

        assert!(list.update(&key(KeyCode::Right)));
        assert_eq!(list.current_page(), 2);

        assert!(list.update(&key(KeyCode::Char('h'))));
        assert_eq!(list.current_page(), 1);

        assert!(list.update(&key(KeyCode::Char(']'))));
        assert_eq!(list.current_page(), 6);
        assert_eq!(list.visible_pages(), &[6, 7, 8, 9, 10]);

        assert!(list.update(&key(KeyCode::Home)));
        assert_eq!(list.current_page(), 5);
        assert_eq!(list.visible_pages(), &[1, 2, 3, 4, 5]);

        assert!(!list.update(&key(KeyCode::Enter)));
        assert!(!list.update(&(Box::new(42u32) as Msg)));
    }

    #[test]
    fn test_update_respects_disabled_bindings() {
        let mut list = controller(5, 12);
        list.keymap_mut().next_page.set_enabled(false);
        assert!(!list.update(&key(KeyCode::Right)));
        assert_eq!(list.current_page(), 1);
    }
}
