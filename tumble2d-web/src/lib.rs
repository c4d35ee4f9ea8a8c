#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use glam::Vec2;
    use js_sys::{Function, Promise, Reflect};
    use tumble2d::anchors::{
        AnchorDef, AnchorSet, AnchorSize, MICROTEXT_RESTITUTION, MICROTEXT_STACK_PX,
    };
    use tumble2d::{
        Bindings, FigureHandles, FigureLayout, FigureSprites, RigidBodyHandle, SegmentId,
        SegmentShape, SpriteSize, SpriteTransform, World,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_futures::spawn_local;

    /// Anchor text table for the "who" page, bundled at build time.
    const WHO_ANCHORS_JSON: &str = include_str!("../assets/who_anchors.json");

    const NAV_MARGIN: f32 = 18.0;
    const NAV_Y: f32 = 40.0;
    const NAV_ITEMS: [(&str, &str); 3] = [("who?", "/who"), ("?", "/"), ("what?", "/what")];

    const PRIMARY_COLORS: [&str; 5] = ["#ff5a5f", "#3a86ff", "#ffbe0b", "#8338ec", "#06d6a0"];

    /// Gain of the pointer-drag velocity controller, per second.
    const DRAG_GAIN: f32 = 20.0;

    /// Longest simulation step tolerated after a stalled tab.
    const MAX_STEP_SECONDS: f64 = 1.0 / 30.0;

    const GRAVITY_MODE_KEY: &str = "gravity-mode";
    const GRAVITY_MODE_TILT: &str = "orientation";
    const GRAVITY_MODE_FIXED: &str = "normal";

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("missing document"))?;

        handle_route(&document);

        // Back/forward buttons re-route; pushState callers dispatch the
        // same event so every navigation funnels through one place.
        let on_popstate = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                handle_route(&document);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
        on_popstate.forget();

        // Same-origin links become client-side navigations.
        let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(target) = event.target() else {
                return;
            };
            let Some(link) = target.dyn_ref::<web_sys::HtmlAnchorElement>() else {
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(origin) = window.location().origin() else {
                return;
            };
            let href = link.href();
            if let Some(path) = href.strip_prefix(&origin) {
                event.prevent_default();
                navigate(path);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();

        Ok(())
    }

    // ---------------------------------------------------------------- router

    type Teardown = Box<dyn FnOnce()>;

    thread_local! {
        static CURRENT_TEARDOWN: RefCell<Option<Teardown>> = const { RefCell::new(None) };
    }

    fn handle_route(document: &web_sys::Document) {
        if let Some(teardown) = CURRENT_TEARDOWN.with(|slot| slot.borrow_mut().take()) {
            teardown();
        }

        let path = current_path();
        log::info!("mounting {path}");
        let mounted = match path.as_str() {
            "/" => mount_home(document),
            "/who" => mount_who(document),
            "/what" => mount_what(document),
            _ => mount_not_found(document),
        };
        match mounted {
            Ok(teardown) => CURRENT_TEARDOWN.with(|slot| *slot.borrow_mut() = Some(teardown)),
            Err(e) => log::error!("mounting {path} failed: {e:?}"),
        }
    }

    fn current_path() -> String {
        let path = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string());
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn navigate(path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if current_path() == path {
            return;
        }
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
        if let Ok(event) = web_sys::Event::new("popstate") {
            let _ = window.dispatch_event(&event);
        }
    }

    // --------------------------------------------------------------- session

    /// Everything one mounted physics page owns. Dropping the page means
    /// flipping `active` off and releasing all of this; deferred work
    /// (asset loads, permission prompts, the frame loop) checks `active`
    /// before touching the session again.
    struct Session {
        active: bool,
        world: World,
        bindings: Bindings<web_sys::HtmlElement>,
        container: web_sys::HtmlElement,
        raf: Option<i32>,
        last_ts_ms: Option<f64>,
        listeners: Vec<ListenerGuard>,
        figure: Option<FigureHandles>,
        drag: Option<DragState>,
        spawned_anchors: HashSet<String>,
        narrow: bool,
    }

    struct DragState {
        body: RigidBodyHandle,
        cursor: Vec2,
    }

    type SessionRef = Rc<RefCell<Session>>;

    fn new_session(document: &web_sys::Document) -> Result<SessionRef, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let viewport = viewport_size(&window);

        let container: web_sys::HtmlElement =
            document.create_element("div")?.dyn_into().unwrap_throw();
        container.set_id("container");
        let style = container.style();
        style.set_property("position", "fixed")?;
        style.set_property("inset", "0")?;
        style.set_property("overflow", "hidden")?;
        style.set_property("touch-action", "none")?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("missing body"))?
            .append_child(&container)?;

        Ok(Rc::new(RefCell::new(Session {
            active: true,
            world: World::new(viewport),
            bindings: Bindings::new(),
            container,
            raf: None,
            last_ts_ms: None,
            listeners: Vec::new(),
            figure: None,
            drag: None,
            spawned_anchors: HashSet::new(),
            narrow: viewport.x <= 768.0,
        })))
    }

    /// Idempotent page teardown: the first call stops the loop, removes
    /// every listener, clears the physics world and detaches the DOM; any
    /// later call finds `active` already off and returns.
    fn teardown_for(session: SessionRef) -> Teardown {
        Box::new(move || {
            let mut s = session.borrow_mut();
            if !s.active {
                return;
            }
            s.active = false;

            if let Some(id) = s.raf.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            for guard in s.listeners.drain(..) {
                guard.remove();
            }
            if let Some(figure) = s.figure.take() {
                s.world.despawn_figure(&figure);
            }
            for binding in s.bindings.drain() {
                s.world.remove_body(binding.body);
                binding.element.remove();
            }
            s.container.remove();
        })
    }

    /// An event listener that can actually be removed again: the closure
    /// stays owned here instead of being forgotten.
    struct ListenerGuard {
        target: web_sys::EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl ListenerGuard {
        fn install(
            target: &web_sys::EventTarget,
            event: &'static str,
            closure: Closure<dyn FnMut(web_sys::Event)>,
        ) -> Result<Self, JsValue> {
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                event,
                closure,
            })
        }

        fn remove(self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
        }
    }

    // ----------------------------------------------------------------- pages

    fn mount_home(document: &web_sys::Document) -> Result<Teardown, JsValue> {
        let container: web_sys::HtmlElement =
            document.create_element("div")?.dyn_into().unwrap_throw();
        container.set_id("container");
        container.set_class_name("homepage");

        let title: web_sys::HtmlElement = document.create_element("h1")?.dyn_into().unwrap_throw();
        title.set_text_content(Some("hello."));
        container.append_child(&title)?;

        for (label, path) in [("who?", "/who"), ("what?", "/what")] {
            let link: web_sys::HtmlAnchorElement =
                document.create_element("a")?.dyn_into().unwrap_throw();
            link.set_href(path);
            link.set_text_content(Some(label));
            link.set_class_name("home-link");
            container.append_child(&link)?;
        }

        document
            .body()
            .ok_or_else(|| JsValue::from_str("missing body"))?
            .append_child(&container)?;

        Ok(Box::new(move || container.remove()))
    }

    fn mount_not_found(document: &web_sys::Document) -> Result<Teardown, JsValue> {
        let container: web_sys::HtmlElement =
            document.create_element("div")?.dyn_into().unwrap_throw();
        container.set_id("container");
        let title: web_sys::HtmlElement = document.create_element("h2")?.dyn_into().unwrap_throw();
        title.set_text_content(Some("nothing here."));
        container.append_child(&title)?;
        let back: web_sys::HtmlAnchorElement =
            document.create_element("a")?.dyn_into().unwrap_throw();
        back.set_href("/");
        back.set_text_content(Some("go back?"));
        container.append_child(&back)?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("missing body"))?
            .append_child(&container)?;
        Ok(Box::new(move || container.remove()))
    }

    fn mount_who(document: &web_sys::Document) -> Result<Teardown, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let viewport = viewport_size(&window);
        let mobile = is_mobile_user_agent(&window);

        let session = new_session(document)?;

        if mobile {
            setup_mobile_gravity(&session, document)?;
        } else {
            session.borrow_mut().world.set_gravity(0.0, 1.0);
        }

        install_nav(&session, document, "/who")?;
        install_anchors(&session, document)?;
        install_dragging(&session)?;
        install_resize(&session, &window)?;

        // The ragdoll drops in once all ten sprites have loaded.
        let scale = if mobile { 0.5 } else { 1.0 };
        let anchor = if mobile {
            Vec2::new(viewport.x * 0.5, viewport.y * 0.28)
        } else {
            Vec2::new(viewport.x * 0.5 - 200.0, viewport.y * 0.25)
        };
        spawn_local(build_figure(session.clone(), document.clone(), scale, anchor));

        start_frame_loop(session.clone())?;

        Ok(teardown_for(session))
    }

    fn mount_what(document: &web_sys::Document) -> Result<Teardown, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let session = new_session(document)?;

        // Slow sideways drift instead of a downward pull.
        let gx = ((js_sys::Math::random() - 0.5) * 0.3) as f32;
        let gy = ((js_sys::Math::random() - 0.5) * 0.3) as f32;
        session.borrow_mut().world.set_gravity(gx, gy);

        install_nav(&session, document, "/what")?;
        install_center_title(&session, document, "things i make")?;
        install_dragging(&session)?;
        install_resize(&session, &window)?;

        start_frame_loop(session.clone())?;

        Ok(teardown_for(session))
    }

    // ------------------------------------------------------------ frame loop

    fn start_frame_loop(session: SessionRef) -> Result<(), JsValue> {
        let raf = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
        let raf2 = raf.clone();
        let session2 = session.clone();
        *raf2.borrow_mut() = Some(Closure::wrap(Box::new(move |ts_ms: f64| {
            let mut s = session.borrow_mut();
            if !s.active {
                return;
            }

            let dt = match s.last_ts_ms {
                Some(prev) => ((ts_ms - prev) * 0.001).clamp(0.0, MAX_STEP_SECONDS) as f32,
                None => 1.0 / 60.0,
            };
            s.last_ts_ms = Some(ts_ms);

            if let Some((body, cursor)) = s.drag.as_ref().map(|d| (d.body, d.cursor)) {
                if let Some((center, _)) = s.world.body_pose(body) {
                    s.world.set_body_velocity(body, (cursor - center) * DRAG_GAIN);
                }
            }

            s.world.step(dt);
            sync_sprites(&s);

            let Some(window) = web_sys::window() else {
                return;
            };
            if let Ok(id) = window.request_animation_frame(
                raf.borrow()
                    .as_ref()
                    .expect("missing closure")
                    .as_ref()
                    .unchecked_ref(),
            ) {
                s.raf = Some(id);
            }
        }) as Box<dyn FnMut(f64)>));

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let id = window.request_animation_frame(
            raf2.borrow()
                .as_ref()
                .expect("missing closure")
                .as_ref()
                .unchecked_ref(),
        )?;
        session2.borrow_mut().raf = Some(id);
        Ok(())
    }

    /// Writes one CSS transform per live binding. Elements that have been
    /// detached or hidden since last frame are skipped, not unbound.
    fn sync_sprites(s: &Session) {
        for binding in s.bindings.iter() {
            let element = &binding.element;
            if !element.is_connected() || element.offset_parent().is_none() {
                continue;
            }
            let Some((center, rotation)) = s.world.body_pose(binding.body) else {
                continue;
            };
            let size = Vec2::new(element.offset_width() as f32, element.offset_height() as f32);
            let transform = SpriteTransform::for_sprite(center, rotation, size);
            let _ = element.style().set_property("transform", &transform.to_css());
        }
    }

    // --------------------------------------------------------------- ragdoll

    async fn build_figure(
        session: SessionRef,
        document: web_sys::Document,
        scale: f32,
        anchor: Vec2,
    ) {
        let container = session.borrow().container.clone();

        let parts = match load_figure_sprites(&document, &container, scale).await {
            Ok(parts) => parts,
            Err(e) => {
                // The page keeps working without the figure.
                log::error!("ragdoll sprites failed to load: {e:?}");
                return;
            }
        };

        let mut s = session.borrow_mut();
        if !s.active {
            // The page was left while the sprites were in flight.
            for (_, element, _) in &parts {
                element.remove();
            }
            return;
        }

        let Some(sprites) = collect_sprites(&parts) else {
            log::error!("ragdoll sprite set is incomplete");
            return;
        };
        let layout = match FigureLayout::build(anchor, scale, &sprites) {
            Ok(layout) => layout,
            Err(e) => {
                log::error!("ragdoll layout rejected: {e}");
                for (_, element, _) in &parts {
                    element.remove();
                }
                return;
            }
        };

        let handles = s.world.spawn_figure(&layout);
        for (id, element, _) in parts {
            if let Some(body) = handles.segment(id) {
                s.bindings.push(body, element);
            }
        }
        s.figure = Some(handles);
        log::info!("ragdoll spawned at {anchor:?} (scale {scale})");
    }

    fn sprite_asset(id: SegmentId) -> String {
        format!("assets/who/{}.png", id.label())
    }

    /// Starts all ten image loads at once, then waits for each in turn.
    /// The first rejection aborts the whole figure and removes every
    /// element already appended.
    async fn load_figure_sprites(
        document: &web_sys::Document,
        container: &web_sys::HtmlElement,
        scale: f32,
    ) -> Result<Vec<(SegmentId, web_sys::HtmlElement, SpriteSize)>, JsValue> {
        let mut pending = Vec::with_capacity(SegmentId::ALL.len());
        for id in SegmentId::ALL {
            let (image, loaded) = begin_image_load(document, container, &sprite_asset(id))?;
            pending.push((id, image, loaded));
        }

        let mut parts = Vec::with_capacity(pending.len());
        let mut failure = None;
        for (id, image, loaded) in pending {
            match loaded.await {
                Ok(_) if failure.is_none() => {
                    let natural =
                        SpriteSize::new(image.natural_width() as f32, image.natural_height() as f32);
                    let scaled = natural.scaled(scale);
                    let style = image.style();
                    style.set_property("width", &format!("{}px", scaled.width))?;
                    style.set_property("height", &format!("{}px", scaled.height))?;
                    let element: web_sys::HtmlElement = image.unchecked_into();
                    parts.push((id, element, natural));
                }
                Ok(_) => image.remove(),
                Err(e) => {
                    failure.get_or_insert(e);
                    image.remove();
                }
            }
        }

        if let Some(e) = failure {
            for (_, element, _) in &parts {
                element.remove();
            }
            return Err(e);
        }
        Ok(parts)
    }

    fn begin_image_load(
        document: &web_sys::Document,
        container: &web_sys::HtmlElement,
        src: &str,
    ) -> Result<(web_sys::HtmlImageElement, JsFuture), JsValue> {
        let image: web_sys::HtmlImageElement =
            document.create_element("img")?.dyn_into().unwrap_throw();
        let style = image.style();
        style.set_property("position", "absolute")?;
        style.set_property("user-select", "none")?;
        // In the tree before the load settles so it can be measured and
        // positioned the moment the figure spawns.
        container.append_child(&image)?;

        let promise = Promise::new(&mut |resolve, reject| {
            image.set_onload(Some(&resolve));
            image.set_onerror(Some(&reject));
        });
        image.set_src(src);
        Ok((image, JsFuture::from(promise)))
    }

    fn collect_sprites(
        parts: &[(SegmentId, web_sys::HtmlElement, SpriteSize)],
    ) -> Option<FigureSprites> {
        let size = |id: SegmentId| {
            parts
                .iter()
                .find(|(pid, _, _)| *pid == id)
                .map(|(_, _, size)| *size)
        };
        Some(FigureSprites {
            head: size(SegmentId::Head)?,
            torso: size(SegmentId::Torso)?,
            left_upper_arm: size(SegmentId::LeftUpperArm)?,
            left_lower_arm: size(SegmentId::LeftLowerArm)?,
            right_upper_arm: size(SegmentId::RightUpperArm)?,
            right_lower_arm: size(SegmentId::RightLowerArm)?,
            left_upper_leg: size(SegmentId::LeftUpperLeg)?,
            left_lower_leg: size(SegmentId::LeftLowerLeg)?,
            right_upper_leg: size(SegmentId::RightUpperLeg)?,
            right_lower_leg: size(SegmentId::RightLowerLeg)?,
        })
    }

    // ------------------------------------------------------------------- nav

    fn install_nav(
        session: &SessionRef,
        document: &web_sys::Document,
        current: &str,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let viewport = viewport_size(&window);
        let highlight = PRIMARY_COLORS
            [(js_sys::Math::random() * PRIMARY_COLORS.len() as f64) as usize % PRIMARY_COLORS.len()];

        let container = session.borrow().container.clone();
        for (index, (label, path)) in NAV_ITEMS.into_iter().enumerate() {
            let element: web_sys::HtmlElement =
                document.create_element("div")?.dyn_into().unwrap_throw();
            element.set_class_name("nav-button");
            element.set_text_content(Some(label));
            let style = element.style();
            style.set_property("position", "absolute")?;
            style.set_property("cursor", "pointer")?;
            style.set_property("user-select", "none")?;
            if path == current {
                style.set_property("color", highlight)?;
            }
            container.append_child(&element)?;

            let rect = element.get_bounding_client_rect();
            let (width, height) = (rect.width() as f32, rect.height() as f32);
            let x = match index {
                0 => NAV_MARGIN,
                1 => (viewport.x - width) * 0.5,
                _ => viewport.x - NAV_MARGIN - width,
            };
            let center = Vec2::new(x + width * 0.5, NAV_Y + height * 0.5);

            let mut s = session.borrow_mut();
            let body = s.world.insert_static_rect(center, width, height);
            s.bindings.push(body, element.clone());
            drop(s);

            let target_path = path.to_string();
            let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
                event.prevent_default();
                // Deferred so the route switch (which drops this very
                // listener) runs after the click dispatch unwinds.
                let path = target_path.clone();
                spawn_local(async move { navigate(&path) });
            }) as Box<dyn FnMut(web_sys::Event)>);
            let guard = ListenerGuard::install(element.as_ref(), "click", on_click)?;
            session.borrow_mut().listeners.push(guard);
        }
        Ok(())
    }

    fn install_center_title(
        session: &SessionRef,
        document: &web_sys::Document,
        text: &str,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let viewport = viewport_size(&window);

        let element: web_sys::HtmlElement =
            document.create_element("h1")?.dyn_into().unwrap_throw();
        element.set_class_name("center-title");
        element.set_text_content(Some(text));
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("user-select", "none")?;

        let mut s = session.borrow_mut();
        s.container.append_child(&element)?;
        let rect = element.get_bounding_client_rect();
        let body = s.world.insert_static_rect(
            viewport * 0.5,
            rect.width() as f32,
            rect.height() as f32,
        );
        s.bindings.push(body, element);
        Ok(())
    }

    // --------------------------------------------------------------- anchors

    fn install_anchors(session: &SessionRef, document: &web_sys::Document) -> Result<(), JsValue> {
        let set = match AnchorSet::from_json_str(WHO_ANCHORS_JSON) {
            Ok(set) => set,
            Err(e) => {
                log::error!("anchor table is invalid: {e}");
                return Ok(());
            }
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let viewport = viewport_size(&window);
        let narrow = session.borrow().narrow;

        for anchor in set.anchors {
            let element: web_sys::HtmlElement =
                document.create_element("div")?.dyn_into().unwrap_throw();
            element.set_id(&anchor.id);
            element.set_class_name(match anchor.size {
                AnchorSize::Big => "anchor anchor-big",
                AnchorSize::Small => "anchor anchor-small",
            });
            element.set_text_content(Some(&anchor.display_text(narrow)));
            let style = element.style();
            style.set_property("position", "absolute")?;
            style.set_property("cursor", "pointer")?;
            style.set_property("user-select", "none")?;

            let mut s = session.borrow_mut();
            s.container.append_child(&element)?;
            let rect = element.get_bounding_client_rect();
            let center = anchor.resolve(viewport, narrow);
            let body = s
                .world
                .insert_static_rect(center, rect.width() as f32, rect.height() as f32);
            s.bindings.push(body, element.clone());
            drop(s);

            let click_session = session.clone();
            let click_document = document.clone();
            let on_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let Some(click) = event.dyn_ref::<web_sys::MouseEvent>() else {
                    return;
                };
                let point = Vec2::new(click.client_x() as f32, click.client_y() as f32);
                if let Err(e) = spawn_micro_texts(&click_session, &click_document, &anchor, point) {
                    log::error!("microtext spawn failed: {e:?}");
                }
            }) as Box<dyn FnMut(web_sys::Event)>);
            let guard = ListenerGuard::install(element.as_ref(), "click", on_click)?;
            session.borrow_mut().listeners.push(guard);
        }
        Ok(())
    }

    /// Drops an anchor's microtexts into the world at the click point,
    /// stacked downward. Each anchor fires once per page visit.
    fn spawn_micro_texts(
        session: &SessionRef,
        document: &web_sys::Document,
        anchor: &AnchorDef,
        point: Vec2,
    ) -> Result<(), JsValue> {
        let mut s = session.borrow_mut();
        if !s.active || !s.spawned_anchors.insert(anchor.id.clone()) {
            return Ok(());
        }

        for (index, micro) in anchor.micro_texts.iter().enumerate() {
            let element: web_sys::HtmlElement = if let Some(link) = &micro.link {
                let a: web_sys::HtmlAnchorElement =
                    document.create_element("a")?.dyn_into().unwrap_throw();
                a.set_href(link);
                a.set_target("_blank");
                a.unchecked_into()
            } else {
                document.create_element("div")?.dyn_into().unwrap_throw()
            };
            let mut class = String::from("microtext");
            if let Some(extra) = &micro.class {
                class.push(' ');
                class.push_str(extra);
            }
            element.set_class_name(&class);
            element.set_text_content(Some(&micro.text));
            let style = element.style();
            style.set_property("position", "absolute")?;
            style.set_property("user-select", "none")?;
            s.container.append_child(&element)?;

            let rect = element.get_bounding_client_rect();
            let center = point + Vec2::new(0.0, index as f32 * MICROTEXT_STACK_PX);
            let body = s.world.insert_dynamic_rect(
                center,
                rect.width() as f32,
                rect.height() as f32,
                MICROTEXT_RESTITUTION,
            );
            s.bindings.push(body, element);
        }
        Ok(())
    }

    // -------------------------------------------------------------- dragging

    fn install_dragging(session: &SessionRef) -> Result<(), JsValue> {
        let container = session.borrow().container.clone();

        let down_session = session.clone();
        let on_down = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(pointer) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            let point = Vec2::new(pointer.client_x() as f32, pointer.client_y() as f32);
            let mut s = down_session.borrow_mut();
            if !s.active {
                return;
            }
            if let Some(body) = hit_test(&s, point) {
                s.drag = Some(DragState {
                    body,
                    cursor: point,
                });
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        let down = ListenerGuard::install(container.as_ref(), "pointerdown", on_down)?;

        let move_session = session.clone();
        let on_move = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(pointer) = event.dyn_ref::<web_sys::MouseEvent>() else {
                return;
            };
            let mut s = move_session.borrow_mut();
            if let Some(drag) = s.drag.as_mut() {
                drag.cursor = Vec2::new(pointer.client_x() as f32, pointer.client_y() as f32);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        let moved = ListenerGuard::install(container.as_ref(), "pointermove", on_move)?;

        let up_session = session.clone();
        let on_up = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            // Released bodies keep their momentum.
            up_session.borrow_mut().drag = None;
        }) as Box<dyn FnMut(web_sys::Event)>);
        let up = ListenerGuard::install(container.as_ref(), "pointerup", on_up)?;

        let cancel_session = session.clone();
        let on_cancel = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            cancel_session.borrow_mut().drag = None;
        }) as Box<dyn FnMut(web_sys::Event)>);
        let cancel = ListenerGuard::install(container.as_ref(), "pointercancel", on_cancel)?;

        let mut s = session.borrow_mut();
        s.listeners.extend([down, moved, up, cancel]);
        Ok(())
    }

    /// Topmost dynamic body whose sprite rectangle contains the point.
    /// Later bindings render above earlier ones, so the last hit wins.
    fn hit_test(s: &Session, point: Vec2) -> Option<RigidBodyHandle> {
        let mut found = None;
        for binding in s.bindings.iter() {
            if !s.world.is_dynamic(binding.body) {
                continue;
            }
            let Some((center, rotation)) = s.world.body_pose(binding.body) else {
                continue;
            };
            let shape = SegmentShape::Rect {
                width: binding.element.offset_width() as f32,
                height: binding.element.offset_height() as f32,
            };
            if shape.contains(center, rotation, point) {
                found = Some(binding.body);
            }
        }
        found
    }

    // --------------------------------------------------------------- gravity

    fn install_resize(session: &SessionRef, window: &web_sys::Window) -> Result<(), JsValue> {
        let resize_session = session.clone();
        let on_resize = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut s = resize_session.borrow_mut();
            if !s.active {
                return;
            }
            let viewport = viewport_size(&window);
            s.world.resize(viewport);
        }) as Box<dyn FnMut(web_sys::Event)>);
        let guard = ListenerGuard::install(window.as_ref(), "resize", on_resize)?;
        session.borrow_mut().listeners.push(guard);
        Ok(())
    }

    /// On touch devices gravity can follow device tilt. The choice is
    /// remembered in local storage; without one, a small prompt asks.
    fn setup_mobile_gravity(
        session: &SessionRef,
        document: &web_sys::Document,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        match stored_gravity_mode(&window).as_deref() {
            Some(GRAVITY_MODE_TILT) => {
                spawn_local(enable_tilt_gravity(session.clone()));
                Ok(())
            }
            Some(_) => {
                session.borrow_mut().world.set_gravity(0.0, 1.0);
                Ok(())
            }
            None => show_gravity_prompt(session, document),
        }
    }

    fn show_gravity_prompt(
        session: &SessionRef,
        document: &web_sys::Document,
    ) -> Result<(), JsValue> {
        let overlay: web_sys::HtmlElement =
            document.create_element("div")?.dyn_into().unwrap_throw();
        overlay.set_id("motion-permission");
        let message: web_sys::HtmlElement =
            document.create_element("p")?.dyn_into().unwrap_throw();
        message.set_text_content(Some("this page can follow your device's tilt. allow motion access?"));
        overlay.append_child(&message)?;

        for (label, mode) in [("sure, tilt away", GRAVITY_MODE_TILT), ("no thanks", GRAVITY_MODE_FIXED)] {
            let button: web_sys::HtmlElement =
                document.create_element("button")?.dyn_into().unwrap_throw();
            button.set_text_content(Some(label));
            overlay.append_child(&button)?;

            let click_session = session.clone();
            let click_overlay = overlay.clone();
            let on_click = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    store_gravity_mode(&window, mode);
                }
                click_overlay.remove();
                if mode == GRAVITY_MODE_TILT {
                    spawn_local(enable_tilt_gravity(click_session.clone()));
                } else {
                    let mut s = click_session.borrow_mut();
                    if s.active {
                        s.world.set_gravity(0.0, 1.0);
                    }
                }
            }) as Box<dyn FnMut(web_sys::Event)>);
            let guard = ListenerGuard::install(button.as_ref(), "click", on_click)?;
            session.borrow_mut().listeners.push(guard);
        }

        session.borrow().container.append_child(&overlay)?;
        Ok(())
    }

    enum MotionAccess {
        Granted,
        Denied,
    }

    /// Asks for orientation events and, depending on the answer, either
    /// wires tilt-driven gravity or falls back to a plain downward pull.
    /// Both outcomes are handled; neither leaves gravity unset.
    async fn enable_tilt_gravity(session: SessionRef) {
        let access = request_motion_access().await;
        let mut s = session.borrow_mut();
        if !s.active {
            return;
        }
        match access {
            MotionAccess::Granted => {
                drop(s);
                if let Err(e) = install_orientation_listener(&session) {
                    log::error!("orientation listener failed: {e:?}");
                    session.borrow_mut().world.set_gravity(0.0, 1.0);
                }
            }
            MotionAccess::Denied => {
                log::warn!("motion access denied, keeping fixed gravity");
                s.world.set_gravity(0.0, 1.0);
            }
        }
    }

    fn install_orientation_listener(session: &SessionRef) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let handler_session = session.clone();
        let on_orientation = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(orientation) = event.dyn_ref::<web_sys::DeviceOrientationEvent>() else {
                return;
            };
            let gx = ((orientation.gamma().unwrap_or(0.0) / 90.0).clamp(-1.0, 1.0)) as f32;
            let gy = ((orientation.beta().unwrap_or(0.0) / 90.0).clamp(-1.0, 1.0)) as f32;
            let mut s = handler_session.borrow_mut();
            if !s.active {
                return;
            }
            s.world.set_gravity(gx, gy);
        }) as Box<dyn FnMut(web_sys::Event)>);
        let guard = ListenerGuard::install(window.as_ref(), "deviceorientation", on_orientation)?;
        session.borrow_mut().listeners.push(guard);
        Ok(())
    }

    /// Feature-detects the iOS-style permission gate. Browsers without
    /// one report orientation support directly.
    async fn request_motion_access() -> MotionAccess {
        let Some(window) = web_sys::window() else {
            return MotionAccess::Denied;
        };
        let ctor = match Reflect::get(window.as_ref(), &JsValue::from_str("DeviceOrientationEvent"))
        {
            Ok(value) if !value.is_undefined() => value,
            _ => return MotionAccess::Denied,
        };
        let request = Reflect::get(&ctor, &JsValue::from_str("requestPermission"))
            .unwrap_or(JsValue::UNDEFINED);

        let Ok(request) = request.dyn_into::<Function>() else {
            let supported = Reflect::has(window.as_ref(), &JsValue::from_str("ondeviceorientation"))
                .unwrap_or(false);
            return if supported {
                MotionAccess::Granted
            } else {
                MotionAccess::Denied
            };
        };

        let Ok(returned) = request.call0(&ctor) else {
            return MotionAccess::Denied;
        };
        let Ok(promise) = returned.dyn_into::<Promise>() else {
            return MotionAccess::Denied;
        };
        match JsFuture::from(promise).await {
            Ok(state) if state.as_string().as_deref() == Some("granted") => MotionAccess::Granted,
            _ => MotionAccess::Denied,
        }
    }

    fn stored_gravity_mode(window: &web_sys::Window) -> Option<String> {
        window
            .local_storage()
            .ok()
            .flatten()
            .and_then(|storage| storage.get_item(GRAVITY_MODE_KEY).ok().flatten())
    }

    fn store_gravity_mode(window: &web_sys::Window, mode: &str) {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(GRAVITY_MODE_KEY, mode);
        }
    }

    // --------------------------------------------------------------- helpers

    fn viewport_size(window: &web_sys::Window) -> Vec2 {
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        Vec2::new(width as f32, height as f32)
    }

    fn is_mobile_user_agent(window: &web_sys::Window) -> bool {
        let agent = window.navigator().user_agent().unwrap_or_default();
        ["Android", "iPhone", "iPad", "iPod"]
            .iter()
            .any(|needle| agent.contains(needle))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod web {
    // This crate is intended to be built via Trunk for `wasm32-unknown-unknown`.
    // Keep a tiny native stub so `cargo test` for the workspace stays green.
}
