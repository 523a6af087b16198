//! `AnimationHost` backed by DOM elements and the Web Animations API.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Animation, Document, Element, Event};

use crate::animation::AnimationDescriptor;
use crate::error::HostError;
use crate::lifecycle::AnimationHost;
use crate::pool::UnitId;

const CONTAINER_CLASS: &str = "squares";

fn js_err(e: JsValue) -> HostError {
    HostError::Js(format!("{e:?}"))
}

/// Creates the `div.squares` container and appends it to `<body>`.
pub fn create_container(document: &Document) -> Result<Element, HostError> {
    let body = document.body().ok_or(HostError::NoBody)?;
    let container = document.create_element("div").map_err(js_err)?;
    container.class_list().add_1(CONTAINER_CLASS).map_err(js_err)?;
    body.append_child(&container).map_err(js_err)?;
    Ok(container)
}

pub struct DomHost {
    document: Document,
    container: Element,
    // Shared by every animation; the unit is recovered from `Animation.id`.
    on_finish: Closure<dyn FnMut(Event)>,
}

impl DomHost {
    /// `notify` receives the unit of every finished animation.
    pub fn new(document: Document, container: Element, notify: impl Fn(UnitId) + 'static) -> Self {
        let on_finish = Closure::wrap(Box::new(move |event: Event| {
            let id = event
                .target()
                .and_then(|target| target.dyn_into::<Animation>().ok())
                .and_then(|animation| animation.id().parse::<usize>().ok());
            match id {
                Some(id) => notify(UnitId(id)),
                None => log::warn!("finish event from an animation without a square id"),
            }
        }) as Box<dyn FnMut(Event)>);

        Self { document, container, on_finish }
    }
}

impl Drop for DomHost {
    fn drop(&mut self) {
        self.container.remove();
    }
}

impl AnimationHost for DomHost {
    type Element = Element;
    type Handle = Animation;

    fn create(&mut self, color_class: &str) -> Result<Element, HostError> {
        let elem = self.document.create_element("div").map_err(js_err)?;
        elem.class_list().add_1(color_class).map_err(js_err)?;
        self.container.append_child(&elem).map_err(js_err)?;
        Ok(elem)
    }

    fn attach(&mut self, element: &Element) -> Result<(), HostError> {
        self.container.append_child(element).map_err(js_err)?;
        Ok(())
    }

    fn detach(&mut self, element: &Element) {
        element.remove();
    }

    fn animate(
        &mut self,
        id: UnitId,
        element: &Element,
        descriptor: &AnimationDescriptor,
    ) -> Result<Animation, HostError> {
        let start: JsValue = descriptor.start.to_css().into();
        let end: JsValue = descriptor.end.to_css().into();
        let keyframes = Object::new();
        set(&keyframes, "transform", &Array::of2(&start, &end))?;
        let opacity = Array::of2(
            &descriptor.start_opacity.into(),
            &descriptor.end_opacity.into(),
        );
        set(&keyframes, "opacity", &opacity)?;

        let options = Object::new();
        set(&options, "duration", &descriptor.duration_ms.into())?;
        set(&options, "iterations", &JsValue::from_f64(1.0))?;
        set(&options, "id", &id.0.to_string().into())?;

        // web-sys binds `animate` per option type; calling it directly avoids that.
        let animate: Function = Reflect::get(element, &"animate".into())
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        let animation: Animation = animate
            .call2(element, &keyframes, &options)
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        animation.set_onfinish(Some(self.on_finish.as_ref().unchecked_ref()));
        Ok(animation)
    }

    fn replay(&mut self, handle: &Animation) -> Result<(), HostError> {
        handle.play().map_err(js_err)
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), HostError> {
    Reflect::set(target, &key.into(), value).map_err(js_err)?;
    Ok(())
}
