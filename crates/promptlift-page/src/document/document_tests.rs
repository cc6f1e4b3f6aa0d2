    use super::*;

    fn element_with_text(doc: &mut Document, tag: &str, text: &str) -> NodeId {
        let el = doc.create_element(tag);
        let t = doc.create_text(text);
        doc.append_child(el, t).unwrap();
        el
    }

    #[test]
    fn test_new_document_has_connected_body() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.url(), "https://example.com/");
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert!(doc.is_connected(doc.body()));
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
    }

    #[test]
    fn test_created_nodes_start_detached() {
        let mut doc = Document::new("about:blank");
        let div = doc.create_element("DIV");
        assert_eq!(doc.tag_name(div), Some("div"));
        assert!(!doc.is_connected(div));

        doc.append_child(doc.body(), div).unwrap();
        assert!(doc.is_connected(div));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new("about:blank");
        let outer = doc.create_element("div");
        let p1 = element_with_text(&mut doc, "p", "Hello ");
        let p2 = element_with_text(&mut doc, "p", "world");
        doc.append_child(outer, p1).unwrap();
        doc.append_child(outer, p2).unwrap();
        assert_eq!(doc.text_content(outer), "Hello world");
    }

    #[test]
    fn test_get_element_by_id_ignores_detached() {
        let mut doc = Document::new("about:blank");
        let detached = doc.create_element("div");
        doc.set_attribute(detached, "id", "target").unwrap();
        assert_eq!(doc.get_element_by_id("target"), None);

        let attached = doc.create_element("div");
        doc.set_attribute(attached, "id", "target").unwrap();
        doc.append_child(doc.body(), attached).unwrap();
        assert_eq!(doc.get_element_by_id("target"), Some(attached));
    }

    #[test]
    fn test_query_attribute_returns_first_in_tree_order() {
        let mut doc = Document::new("about:blank");
        let a = doc.create_element("div");
        doc.set_attribute(a, "role", "textbox").unwrap();
        let b = doc.create_element("div");
        doc.set_attribute(b, "role", "textbox").unwrap();
        let span = doc.create_element("span");
        doc.set_attribute(span, "role", "textbox").unwrap();

        doc.append_child(doc.body(), span).unwrap();
        doc.append_child(doc.body(), a).unwrap();
        doc.append_child(doc.body(), b).unwrap();

        assert_eq!(doc.query_attribute(Some("div"), "role", "textbox"), Some(a));
        assert_eq!(doc.query_attribute(None, "role", "textbox"), Some(span));
        assert_eq!(doc.query_attribute(Some("div"), "role", "button"), None);
    }

    #[test]
    fn test_append_child_rejects_cycles_and_text_parents() {
        let mut doc = Document::new("about:blank");
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();

        assert!(matches!(
            doc.append_child(inner, outer),
            Err(DomError::HierarchyRequest(_))
        ));

        let text = doc.create_text("x");
        assert_eq!(doc.append_child(text, inner), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = Document::new("about:blank");
        let first = doc.create_element("div");
        let second = doc.create_element("div");
        let child = doc.create_element("p");
        doc.append_child(first, child).unwrap();
        doc.append_child(second, child).unwrap();

        assert!(doc.children(first).is_empty());
        assert_eq!(doc.children(second), &[child]);
        assert_eq!(doc.parent(child), Some(second));
    }

    #[test]
    fn test_set_text_content_on_element() {
        let mut doc = Document::new("about:blank");
        let el = element_with_text(&mut doc, "div", "old");
        let extra = doc.create_element("br");
        doc.append_child(el, extra).unwrap();

        doc.set_text_content(el, "new").unwrap();
        assert_eq!(doc.children(el).len(), 1);
        assert_eq!(doc.text_content(el), "new");

        doc.set_text_content(el, "").unwrap();
        assert!(doc.children(el).is_empty());
    }

    #[test]
    fn test_remove_child_requires_parent() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        assert!(doc.remove_child(doc.body(), el).is_err());

        doc.append_child(doc.body(), el).unwrap();
        doc.remove_child(doc.body(), el).unwrap();
        assert!(!doc.is_connected(el));
    }

    #[test]
    fn test_observer_receives_subtree_character_data() {
        let mut doc = Document::new("about:blank");
        let box_el = element_with_text(&mut doc, "div", "a");
        doc.append_child(doc.body(), box_el).unwrap();
        let text = doc.children(box_el)[0];

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ObserverId::next();
        doc.observe(id, box_el, ObserveOptions::content(), tx).unwrap();

        doc.set_character_data(text, "ab").unwrap();
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.observer, id);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].target, text);
        assert_eq!(
            batch.records[0].kind,
            MutationKind::CharacterData { old_value: "a".to_string() }
        );
    }

    #[test]
    fn test_observer_filters_by_options() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        doc.observe(ObserverId::next(), el, ObserveOptions::content(), tx).unwrap();

        doc.set_attribute(el, "class", "focused").unwrap();
        assert!(rx.try_recv().is_err());

        let p = doc.create_element("p");
        doc.append_child(el, p).unwrap();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_observer_without_subtree_ignores_descendants() {
        let mut doc = Document::new("about:blank");
        let el = element_with_text(&mut doc, "div", "a");
        doc.append_child(doc.body(), el).unwrap();
        let text = doc.children(el)[0];

        let options = ObserveOptions {
            subtree: false,
            ..ObserveOptions::content()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        doc.observe(ObserverId::next(), el, options, tx).unwrap();

        doc.set_character_data(text, "b").unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_observe_same_target_replaces_registration() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        let id = ObserverId::next();
        let (tx, _rx) = mpsc::unbounded_channel();

        doc.observe(id, el, ObserveOptions::content(), tx.clone()).unwrap();
        doc.observe(id, el, ObserveOptions::content(), tx).unwrap();
        assert_eq!(doc.registration_count(el), 1);

        doc.disconnect(id);
        assert_eq!(doc.registration_count(el), 0);
    }

    #[test]
    fn test_one_batch_per_operation_per_observer() {
        let mut doc = Document::new("about:blank");
        let el = element_with_text(&mut doc, "div", "a");
        doc.append_child(doc.body(), el).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = ObserverId::next();
        doc.observe(id, doc.body(), ObserveOptions::content(), tx.clone()).unwrap();
        doc.observe(id, el, ObserveOptions::content(), tx).unwrap();

        doc.set_text_content(el, "b").unwrap();
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.records.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_prunes_registration() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        doc.observe(ObserverId::next(), el, ObserveOptions::content(), tx).unwrap();
        drop(rx);

        doc.set_text_content(el, "x").unwrap();
        assert_eq!(doc.registration_count(el), 0);
    }

    #[test]
    fn test_dispatch_event_bubbles_to_ancestors() {
        let mut doc = Document::new("about:blank");
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el).unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        doc.add_event_listener(doc.body(), "input", tx).unwrap();

        let seen = doc
            .dispatch_event(el, DomEvent::new("input").bubbles(true))
            .unwrap();
        assert_eq!(seen, 1);
        let event = rx.try_recv().unwrap();
        assert_eq!(event.target, el);
        assert_eq!(event.current_target, doc.body());

        let seen = doc.dispatch_event(el, DomEvent::new("input")).unwrap();
        assert_eq!(seen, 0);
    }

    #[test]
    fn test_dispatch_event_on_text_node_fails() {
        let mut doc = Document::new("about:blank");
        let text = doc.create_text("x");
        assert_eq!(
            doc.dispatch_event(text, DomEvent::new("input")),
            Err(DomError::NotAnElement(text))
        );
    }
